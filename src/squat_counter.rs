//! Repetition counting from knee angles.
//!
//! A two-state machine (standing / down) driven by the average knee angle.
//! The standing baseline is recalibrated whenever the legs are extended, and
//! the down threshold is derived from it. Going down is gated on a plausible
//! squat position; coming back up only needs the legs straight again so that
//! a noisy frame near the top never costs a rep.

use crate::{
    config::SquatCounterConfig,
    constants::{LEG_LANDMARKS, STRAIGHT_ANGLE},
    geometry::calculate_angle,
    landmarks::{self, Landmark},
};
use log::{debug, trace};

/// Outcome of processing one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SquatCounterResult {
    /// Reps counted in this round so far
    pub count: u32,
    /// This frame completed a rep
    pub new_count: bool,
    /// The counter currently considers the user down
    pub is_squat_down: bool,
}

/// Knee angles measured on the last accepted frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KneeAngles {
    /// Left hip-knee-ankle angle in degrees
    pub left: f64,
    /// Right hip-knee-ankle angle in degrees
    pub right: f64,
    /// Mean of both sides
    pub average: f64,
    /// Absolute left/right difference
    pub difference: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SquatState {
    Standing,
    Down,
}

/// Squat repetition counter
pub struct SquatCounter {
    config: SquatCounterConfig,
    count: u32,
    state: SquatState,
    debounce: u32,
    standing_knee_angle: Option<f64>,
    min_depth: f64,
    last_angles: Option<KneeAngles>,
}

impl SquatCounter {
    /// Create a counter with default tuning
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SquatCounterConfig::default())
    }

    /// Create a counter with explicit tuning
    #[must_use]
    pub fn with_config(config: SquatCounterConfig) -> Self {
        Self {
            config,
            count: 0,
            state: SquatState::Standing,
            debounce: 0,
            standing_knee_angle: None,
            min_depth: STRAIGHT_ANGLE,
            last_angles: None,
        }
    }

    /// Process one frame
    pub fn process(&mut self, frame: &[Landmark]) -> SquatCounterResult {
        let Some(legs) = landmarks::select(frame, LEG_LANDMARKS) else {
            return self.result(false);
        };
        if legs
            .iter()
            .any(|lm| !(lm.visibility >= self.config.landmark_visibility_floor) || !lm.x.is_finite() || !lm.y.is_finite())
        {
            return self.result(false);
        }
        let [left_hip, right_hip, left_knee, right_knee, left_ankle, right_ankle] = legs;

        let left = calculate_angle(left_hip.point(), left_knee.point(), left_ankle.point());
        let right = calculate_angle(right_hip.point(), right_knee.point(), right_ankle.point());
        let angles = KneeAngles {
            left,
            right,
            average: (left + right) / 2.0,
            difference: (left - right).abs(),
        };
        self.last_angles = Some(angles);
        trace!(
            "Knee angles L {:.1} R {:.1} avg {:.1}",
            angles.left,
            angles.right,
            angles.average
        );

        if angles.average >= self.config.standing_angle && angles.difference < self.config.calibration_symmetry {
            self.standing_knee_angle = Some(angles.average);
        }

        let mut new_count = false;
        match self.state {
            SquatState::Standing => {
                let knees = KneePlacement {
                    left_hip,
                    right_hip,
                    left_knee,
                    right_knee,
                };
                if angles.average <= self.down_threshold() && self.is_valid_squat_position(&angles, &knees) {
                    self.debounce += 1;
                    if self.debounce >= self.config.debounce_frames {
                        self.state = SquatState::Down;
                        self.debounce = 0;
                        self.min_depth = self.min_depth.min(angles.average);
                        debug!("Squat down at {:.1} degrees", angles.average);
                    }
                } else {
                    self.debounce = 0;
                }
            }
            SquatState::Down => {
                self.min_depth = self.min_depth.min(angles.average);
                if angles.average >= self.config.standing_angle {
                    self.debounce += 1;
                    if self.debounce >= self.config.debounce_frames {
                        self.state = SquatState::Standing;
                        self.debounce = 0;
                        self.count += 1;
                        new_count = true;
                        debug!("Rep {} counted, deepest {:.1} degrees", self.count, self.min_depth);
                    }
                } else {
                    self.debounce = 0;
                }
            }
        }

        self.result(new_count)
    }

    /// Zero the count and forget this round's calibration
    pub fn reset_count(&mut self) {
        self.count = 0;
        self.state = SquatState::Standing;
        self.debounce = 0;
        self.standing_knee_angle = None;
        self.min_depth = STRAIGHT_ANGLE;
        self.last_angles = None;
    }

    /// Reps counted this round
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Whether the user is currently considered down
    #[must_use]
    pub fn is_squat_down(&self) -> bool {
        self.state == SquatState::Down
    }

    /// Calibrated standing knee angle, once one has been observed
    #[must_use]
    pub const fn standing_knee_angle(&self) -> Option<f64> {
        self.standing_knee_angle
    }

    /// Deepest average knee angle reached while down this round
    #[must_use]
    pub const fn min_depth(&self) -> f64 {
        self.min_depth
    }

    /// Angles measured on the last frame that passed the visibility floor
    #[must_use]
    pub const fn last_angles(&self) -> Option<KneeAngles> {
        self.last_angles
    }

    /// Average knee angle at or below which a frame counts as down
    #[must_use]
    pub fn down_threshold(&self) -> f64 {
        self.standing_knee_angle
            .map_or(self.config.fallback_down_angle, |standing| standing - self.config.down_offset)
    }

    fn is_valid_squat_position(&self, angles: &KneeAngles, knees: &KneePlacement) -> bool {
        let Some(standing) = self.standing_knee_angle else {
            return false;
        };
        angles.difference <= self.config.max_knee_asymmetry
            && standing - angles.average >= self.config.min_knee_bend
            && knees.left_knee.visibility >= self.config.knee_visibility_floor
            && knees.right_knee.visibility >= self.config.knee_visibility_floor
            && knees.left_knee.y > knees.left_hip.y
            && knees.right_knee.y > knees.right_hip.y
    }

    fn result(&self, new_count: bool) -> SquatCounterResult {
        SquatCounterResult {
            count: self.count,
            new_count,
            is_squat_down: self.is_squat_down(),
        }
    }
}

impl Default for SquatCounter {
    fn default() -> Self {
        Self::new()
    }
}

struct KneePlacement {
    left_hip: Landmark,
    right_hip: Landmark,
    left_knee: Landmark,
    right_knee: Landmark,
}
