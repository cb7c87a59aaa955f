//! Challenge phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two exercise rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Round {
    /// First round, preceded by the hydrate countdown
    One,
    /// Second round, preceded by recovery
    Two,
}

impl Round {
    /// 1 or 2
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {}", self.number())
    }
}

/// The active phase of a challenge session
///
/// Each variant carries only the state that belongs to that phase instance.
/// Entering a phase always builds a fresh value, so one-shot flags such as
/// `reminder_played` start cleared every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Instructions and device check
    Setup,
    /// Waiting for the user to be framed correctly
    PositionCheck {
        /// Round that starts once the position is accepted
        round: Round,
        /// Position accepted, transition already scheduled
        confirmed: bool,
    },
    /// Drink-water countdown before round one
    Hydrate {
        /// The five-seconds-left reminder has played
        reminder_played: bool,
    },
    /// Short "go" cue before an exercise round
    Go {
        /// Round about to start
        round: Round,
    },
    /// Timed squat round
    Exercise {
        /// Round in progress
        round: Round,
    },
    /// Rest countdown between rounds
    Recovery {
        /// The five-seconds-left reminder has played
        reminder_played: bool,
    },
    /// Both rounds done, congratulations playing
    Completed,
    /// Photo countdown
    TakePicture {
        /// The still frame has been taken
        captured: bool,
    },
    /// Final score
    Result,
}

impl SessionPhase {
    /// Stable name for logs and projections
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::PositionCheck { round: Round::One, .. } => "position_before_round_1",
            Self::PositionCheck { round: Round::Two, .. } => "position_before_round_2",
            Self::Hydrate { .. } => "hydrate",
            Self::Go { .. } => "go",
            Self::Exercise { .. } => "exercise",
            Self::Recovery { .. } => "recovery",
            Self::Completed => "completed",
            Self::TakePicture { .. } => "take_picture",
            Self::Result => "result",
        }
    }

    /// Round this phase belongs to, where that is unambiguous
    #[must_use]
    pub const fn round(&self) -> Option<Round> {
        match self {
            Self::PositionCheck { round, .. } | Self::Go { round } | Self::Exercise { round } => Some(*round),
            Self::Hydrate { .. } => Some(Round::One),
            _ => None,
        }
    }

    /// Phases that run a one-second countdown
    #[must_use]
    pub const fn is_timed(&self) -> bool {
        matches!(
            self,
            Self::Hydrate { .. } | Self::Recovery { .. } | Self::Exercise { .. } | Self::TakePicture { .. }
        )
    }

    /// Phases whose only gate is the position validator
    #[must_use]
    pub const fn is_position_check(&self) -> bool {
        matches!(self, Self::PositionCheck { .. })
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
