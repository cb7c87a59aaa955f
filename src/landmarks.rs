//! Body landmark types produced by the external pose detector.

use crate::constants::NUM_POSE_LANDMARKS;
use serde::{Deserialize, Serialize};

/// One detected body joint in normalized image coordinates
///
/// `x` and `y` are in `[0, 1]` with `y` growing downwards. `visibility` is the
/// detector's confidence that the joint is actually in view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Relative depth, when the detector provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detector confidence in `[0, 1]`
    pub visibility: f64,
}

impl Landmark {
    /// Create a landmark without depth
    #[must_use]
    pub const fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, z: None, visibility }
    }

    /// The 2D position as a point
    #[must_use]
    pub const fn point(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// All landmarks detected in one video frame, in detector order
pub type PoseFrame = Vec<Landmark>;

/// Whether a frame carries a complete body.
///
/// Anything shorter than the detector's full landmark set is treated as
/// "no person detected".
#[must_use]
pub fn has_full_body(frame: &[Landmark]) -> bool {
    frame.len() >= NUM_POSE_LANDMARKS
}

/// Pick the landmarks at `indices`, or `None` if the frame is incomplete
#[must_use]
pub fn select<const N: usize>(frame: &[Landmark], indices: [usize; N]) -> Option<[Landmark; N]> {
    if !has_full_body(frame) {
        return None;
    }
    let mut out = [Landmark::default(); N];
    for (slot, &index) in out.iter_mut().zip(indices.iter()) {
        *slot = *frame.get(index)?;
    }
    Some(out)
}
