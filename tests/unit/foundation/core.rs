use super::*;

#[test]
fn increasing_progress_is_forward() {
    assert_eq!(ScrollProgress::new(0.5, 0.3).direction(), Direction::Forward);
}

#[test]
fn decreasing_progress_is_backward() {
    assert_eq!(ScrollProgress::new(0.3, 0.5).direction(), Direction::Backward);
}

#[test]
fn stalled_progress_is_backward() {
    assert_eq!(ScrollProgress::new(0.4, 0.4).direction(), Direction::Backward);
}

#[test]
fn progress_is_clamped() {
    let p = ScrollProgress::new(1.7, -0.2);
    assert_eq!(p.current, 1.0);
    assert_eq!(p.previous, 0.0);
    assert_eq!(clamp_progress(f64::NAN), 0.0);
}
