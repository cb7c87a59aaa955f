//! Plane geometry helpers for joint angles.

/// Interior angle at `b` formed by the segments `b -> a` and `b -> c`, in degrees.
///
/// The result is in `[0, 180]`. NaN inputs propagate to a NaN result, so callers
/// are expected to have filtered low-confidence landmarks first.
#[must_use]
pub fn calculate_angle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let radians = (c.1 - b.1).atan2(c.0 - b.0) - (a.1 - b.1).atan2(a.0 - b.0);
    let angle = radians.abs().to_degrees();

    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Midpoint of two points
#[must_use]
pub fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}
