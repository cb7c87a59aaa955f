//! Frame-by-frame check that the user is fully and squarely in view.
//!
//! The validator requires a streak of consecutive passing frames before it
//! reports success. A single failing frame ends the streak, there is no
//! partial credit.

use crate::{
    constants::{
        KEY_BODY_LANDMARKS, LEFT_ANKLE, LEFT_HIP, LEFT_SHOULDER, POSITION_SPEECH_COOLDOWN_MS, RIGHT_ANKLE,
        RIGHT_HIP, RIGHT_SHOULDER,
    },
    device::DeviceProfile,
    geometry::midpoint,
    landmarks::{self, Landmark},
};
use log::{debug, trace};
use std::fmt;

/// Why a frame failed the position check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionIssue {
    /// Fewer landmarks than a full body
    NoPerson,
    /// Key joints hidden, touching the frame edge, or body too small
    NotFullyVisible,
    /// Shoulders or hips too narrow, usually because the user is side-on
    NotFacingCamera,
    /// Shoulders not above hips
    NotStraight,
}

impl PositionIssue {
    /// Hint shown to the user
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoPerson => "No person detected",
            Self::NotFullyVisible => "Step back so your whole body is visible",
            Self::NotFacingCamera => "Face the camera and get into position",
            Self::NotStraight => "Stand straight and face the camera",
        }
    }
}

impl fmt::Display for PositionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Message shown once the streak is long enough
pub const POSITION_READY_MESSAGE: &str = "Perfect position! Ready to start!";

/// Outcome of validating one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// The required streak has been reached
    pub is_valid: bool,
    /// Hint or progress text for the user
    pub message: String,
    /// The failed check, if any
    pub issue: Option<PositionIssue>,
    /// The caller may play the "position good" announcement now
    pub announce_position_good: bool,
}

impl ValidationResult {
    fn failed(issue: PositionIssue) -> Self {
        Self {
            is_valid: false,
            message: issue.message().to_string(),
            issue: Some(issue),
            announce_position_good: false,
        }
    }
}

/// Position validator with a consecutive-frame streak
pub struct PositionValidator {
    profile: DeviceProfile,
    valid_frames: u32,
    has_spoken_position_good: bool,
    last_speech_ms: Option<u64>,
}

impl PositionValidator {
    /// Create a validator with the given thresholds
    #[must_use]
    pub fn new(profile: DeviceProfile) -> Self {
        Self {
            profile,
            valid_frames: 0,
            has_spoken_position_good: false,
            last_speech_ms: None,
        }
    }

    /// Thresholds in use
    #[must_use]
    pub const fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Current streak length
    #[must_use]
    pub const fn valid_frames(&self) -> u32 {
        self.valid_frames
    }

    /// Streak progress towards acceptance, in `[0, 1]`
    #[must_use]
    pub fn progress(&self) -> f64 {
        (f64::from(self.valid_frames) / f64::from(self.profile.required_valid_frames)).min(1.0)
    }

    /// Validate one frame observed at `now_ms`
    pub fn validate(&mut self, frame: &[Landmark], now_ms: u64) -> ValidationResult {
        if let Err(issue) = self.check_frame(frame) {
            if self.valid_frames > 0 {
                trace!("Position streak broken after {} frames: {issue}", self.valid_frames);
            }
            self.break_streak();
            return ValidationResult::failed(issue);
        }

        self.valid_frames += 1;

        let mut announce = false;
        if !self.has_spoken_position_good && self.valid_frames >= self.profile.audio_trigger_frames {
            let cooled_down = self
                .last_speech_ms
                .map_or(true, |last| now_ms.saturating_sub(last) >= POSITION_SPEECH_COOLDOWN_MS);
            if cooled_down {
                self.has_spoken_position_good = true;
                self.last_speech_ms = Some(now_ms);
                announce = true;
            }
        }

        let required = self.profile.required_valid_frames;
        if self.valid_frames >= required {
            if self.valid_frames == required {
                debug!("Position accepted after {required} consecutive frames");
            }
            ValidationResult {
                is_valid: true,
                message: POSITION_READY_MESSAGE.to_string(),
                issue: None,
                announce_position_good: announce,
            }
        } else {
            ValidationResult {
                is_valid: false,
                message: format!(
                    "Good position! Hold still... ({} more frames)",
                    required - self.valid_frames
                ),
                issue: None,
                announce_position_good: announce,
            }
        }
    }

    /// Clear all streak and announcement state
    pub fn reset(&mut self) {
        self.valid_frames = 0;
        self.has_spoken_position_good = false;
        self.last_speech_ms = None;
    }

    // The last speech time survives so the cooldown spans consecutive streaks
    fn break_streak(&mut self) {
        self.valid_frames = 0;
        self.has_spoken_position_good = false;
    }

    fn check_frame(&self, frame: &[Landmark]) -> Result<(), PositionIssue> {
        let Some(key) = landmarks::select(frame, KEY_BODY_LANDMARKS) else {
            return Err(PositionIssue::NoPerson);
        };
        let p = &self.profile;

        // NaN fails every comparison, so non-finite joints are rejected here
        if key
            .iter()
            .any(|lm| !(lm.visibility >= p.min_visibility) || !lm.x.is_finite() || !lm.y.is_finite())
        {
            return Err(PositionIssue::NotFullyVisible);
        }

        let (min_x, max_x, min_y, max_y) = key.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(min_x, max_x, min_y, max_y), lm| (min_x.min(lm.x), max_x.max(lm.x), min_y.min(lm.y), max_y.max(lm.y)),
        );
        let upper = 1.0 - p.edge_margin;
        if min_x < p.edge_margin || max_x > upper || min_y < p.edge_margin || max_y > upper {
            return Err(PositionIssue::NotFullyVisible);
        }

        let get = |index: usize| frame[index];
        let shoulder_y = (get(LEFT_SHOULDER).y + get(RIGHT_SHOULDER).y) / 2.0;
        let ankle_y = (get(LEFT_ANKLE).y + get(RIGHT_ANKLE).y) / 2.0;
        if ankle_y - shoulder_y < p.min_body_height {
            return Err(PositionIssue::NotFullyVisible);
        }

        let shoulder_width = (get(LEFT_SHOULDER).x - get(RIGHT_SHOULDER).x).abs();
        let hip_width = (get(LEFT_HIP).x - get(RIGHT_HIP).x).abs();
        if shoulder_width < p.min_body_width || hip_width < p.min_body_width {
            return Err(PositionIssue::NotFacingCamera);
        }

        let shoulder_center = midpoint(get(LEFT_SHOULDER).point(), get(RIGHT_SHOULDER).point());
        let hip_center = midpoint(get(LEFT_HIP).point(), get(RIGHT_HIP).point());
        if (shoulder_center.0 - hip_center.0).abs() > p.max_body_misalignment {
            return Err(PositionIssue::NotStraight);
        }

        Ok(())
    }
}
