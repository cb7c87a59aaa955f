//! Side effects the session triggers in its collaborators.
//!
//! Audio playback, still-frame capture and camera ownership live outside
//! this crate. The session only calls into them through [`SessionHooks`].

use super::phase::SessionPhase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spoken announcements the session can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    /// The user is framed correctly
    PositionGood,
    /// Five seconds left of the hydrate countdown
    HydrateReminder,
    /// Five seconds left of recovery
    RecoveryReminder,
    /// Round one finished, recovery starts
    RoundOneComplete,
    /// Round two finished
    Congratulations,
    /// A rep was counted, carrying the round's new count
    Count(u32),
}

impl Announcement {
    /// Text handed to the speech collaborator
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::PositionGood => "Perfect position! Hold still.".to_string(),
            Self::HydrateReminder => "Five seconds left. Finish your water and get ready!".to_string(),
            Self::RecoveryReminder => "Five seconds left. Get ready for round two!".to_string(),
            Self::RoundOneComplete => "Great job! Round one complete. Take a moment to recover.".to_string(),
            Self::Congratulations => "Congratulations! You completed the challenge!".to_string(),
            Self::Count(count) => count.to_string(),
        }
    }
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// One still frame taken from the live video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedFrame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Encoded image bytes, format owned by the capture collaborator
    pub data: Vec<u8>,
    /// Session clock time of the capture
    pub captured_at_ms: u64,
}

/// Collaborator hooks invoked by the session
pub trait SessionHooks {
    /// Play or queue an announcement
    fn announce(&mut self, announcement: Announcement);

    /// Grab the current video frame, `None` if no frame is available
    fn capture_frame(&mut self, now_ms: u64) -> Option<CapturedFrame>;

    /// Stop using the camera device
    fn release_camera(&mut self) {}

    /// Called after every phase transition
    fn phase_changed(&mut self, _from: SessionPhase, _to: SessionPhase) {}
}

/// Hooks that do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl SessionHooks for NoHooks {
    fn announce(&mut self, _announcement: Announcement) {}

    fn capture_frame(&mut self, _now_ms: u64) -> Option<CapturedFrame> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_text() {
        assert_eq!(Announcement::Count(12).text(), "12");
        assert_eq!(Announcement::Count(3).to_string(), "3");
    }

    #[test]
    fn test_announcements_are_distinct() {
        let all = [
            Announcement::PositionGood,
            Announcement::HydrateReminder,
            Announcement::RecoveryReminder,
            Announcement::RoundOneComplete,
            Announcement::Congratulations,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.text(), b.text());
            }
        }
    }

    #[test]
    fn test_no_hooks_captures_nothing() {
        let mut hooks = NoHooks;
        hooks.announce(Announcement::PositionGood);
        assert!(hooks.capture_frame(0).is_none());
    }
}
