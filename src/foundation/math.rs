/// Tolerance used when comparing accumulated timeline seconds against boundaries.
pub(crate) const TIME_EPSILON: f64 = 1e-9;

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Normalized local progress of a sub-tween spanning `[offset, offset + duration]`.
pub(crate) fn local_progress(elapsed: f64, offset: f64, duration: f64) -> f64 {
    if duration <= TIME_EPSILON {
        return if elapsed + TIME_EPSILON >= offset {
            1.0
        } else {
            0.0
        };
    }
    ((elapsed - offset) / duration).clamp(0.0, 1.0)
}
