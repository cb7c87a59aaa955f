//! Read-only projections of session state.

use super::{
    hooks::CapturedFrame,
    phase::{Round, SessionPhase},
};
use crate::fps_monitor::Compatibility;
use serde::{Deserialize, Serialize};

/// What the UI shows, re-derived on every frame or tick
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    /// Active phase
    pub phase: SessionPhase,
    /// Round of the active phase, if any
    pub round: Option<Round>,
    /// Seconds left on the countdown in timed phases
    pub time_remaining: Option<u32>,
    /// Countdown progress in `[0, 100]` in timed phases
    pub progress_percent: Option<f64>,
    /// Reps in the current or most recent round
    pub live_count: u32,
    /// Reps across both rounds
    pub total_squats: u32,
    /// Last position validator message during a position check
    pub position_message: Option<String>,
    /// Last position validator verdict
    pub position_valid: bool,
    /// Device frame rate verdict
    pub compatibility: Compatibility,
    /// False once the session has been exited
    pub running: bool,
}

/// Final score handed to the share-image collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResult {
    /// Reps across both rounds
    pub total_squats: u32,
    /// Reps in round one
    pub round1_count: u32,
    /// Reps in round two
    pub round2_count: u32,
    /// Still frame taken during the photo countdown
    #[serde(skip)]
    pub photo: Option<CapturedFrame>,
}

impl ChallengeResult {
    /// Reps in one round
    #[must_use]
    pub const fn round_count(&self, round: Round) -> u32 {
        match round {
            Round::One => self.round1_count,
            Round::Two => self.round2_count,
        }
    }
}

/// Countdown progress as a percentage of `total_secs`, clamped to `[0, 100]`
#[must_use]
pub fn countdown_progress(total_secs: u32, remaining_secs: u32) -> f64 {
    if total_secs == 0 {
        return 100.0;
    }
    let elapsed = f64::from(total_secs) - f64::from(remaining_secs);
    (elapsed / f64::from(total_secs) * 100.0).clamp(0.0, 100.0)
}
