use super::*;
use crate::sim::SimBackend;

fn setup() -> (TransformHandoffController, PillAnimationState, SimBackend) {
    let mut backend = SimBackend::new(1280.0, 800.0);
    let ctl = TransformHandoffController::new(HandoffConfig::default(), &mut backend).unwrap();
    (ctl, PillAnimationState::default(), backend)
}

#[test]
fn curve_endpoints_match_resting_rule() {
    let cfg = HandoffConfig::default();
    let start = handoff_frame(&cfg, 0.0);
    assert_eq!(start.y, -120.0);
    assert!((start.opacity - 0.95).abs() < 1e-12);

    let end = handoff_frame(&cfg, 1.0);
    assert!(end.y.abs() < 1e-9);
    assert!((end.opacity - 1.0).abs() < 1e-12);

    let mid = handoff_frame(&cfg, 0.5);
    assert!((mid.eased - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
}

#[test]
fn curve_is_monotone() {
    let cfg = HandoffConfig::default();
    let mut prev = handoff_frame(&cfg, 0.0);
    for i in 1..=200 {
        let f = handoff_frame(&cfg, f64::from(i) / 200.0);
        assert!(f.y >= prev.y, "offset decreased at step {i}");
        assert!(f.opacity >= prev.opacity, "opacity decreased at step {i}");
        prev = f;
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    let cfg = HandoffConfig::default();
    assert_eq!(handoff_frame(&cfg, -3.0), handoff_frame(&cfg, 0.0));
    assert_eq!(handoff_frame(&cfg, 7.0), handoff_frame(&cfg, 1.0));
}

#[test]
fn registers_scrubbed_sub_region_on_mockup() {
    let (_, _, backend) = setup();
    let region = &backend.regions()[0];
    assert_eq!(region.id, RegionId::Handoff);
    assert_eq!(region.trigger, ElementRole::Mockup);
    assert_eq!(region.scrub_secs, Some(2.0));
}

#[test]
fn progress_writes_manual_styles() {
    let (mut ctl, mut state, mut backend) = setup();
    ctl.on_progress(&mut state, 0.0, &mut backend).unwrap();
    assert_eq!(
        backend.style(ElementRole::PillWrapper, "transform"),
        Some(StyleValue::TranslateY(-120.0))
    );
    assert_eq!(
        backend.style(ElementRole::PillWrapper, "opacity"),
        Some(StyleValue::Number(0.95))
    );
    assert!(!state.transform_handoff_done);
}

#[test]
fn completion_clears_styles_once() {
    let (mut ctl, mut state, mut backend) = setup();
    ctl.on_progress(&mut state, 0.5, &mut backend).unwrap();
    ctl.on_progress(&mut state, 0.995, &mut backend).unwrap();
    assert!(state.transform_handoff_done);
    assert_eq!(backend.style(ElementRole::PillWrapper, "transform"), None);
    assert_eq!(backend.style(ElementRole::PillWrapper, "opacity"), None);

    let writes = backend.element(ElementRole::PillWrapper).unwrap().style_writes;
    ctl.on_progress(&mut state, 0.7, &mut backend).unwrap();
    ctl.on_progress(&mut state, 1.0, &mut backend).unwrap();
    assert_eq!(
        backend.element(ElementRole::PillWrapper).unwrap().style_writes,
        writes
    );
    assert_eq!(backend.style(ElementRole::PillWrapper, "transform"), None);
}

#[test]
fn leave_back_rearms_manual_control() {
    let (mut ctl, mut state, mut backend) = setup();
    ctl.on_progress(&mut state, 1.0, &mut backend).unwrap();
    assert!(state.transform_handoff_done);

    ctl.on_leave_back(&mut state);
    assert!(!state.transform_handoff_done);
    ctl.on_progress(&mut state, 0.2, &mut backend).unwrap();
    assert!(matches!(
        backend.style(ElementRole::PillWrapper, "transform"),
        Some(StyleValue::TranslateY(y)) if y < 0.0
    ));
}

#[test]
fn missing_pill_is_reported() {
    let mut backend = SimBackend::new(1280.0, 800.0).without(ElementRole::PillWrapper);
    let err = TransformHandoffController::new(HandoffConfig::default(), &mut backend).unwrap_err();
    assert!(err.is_missing_target());
    assert!(backend.regions().is_empty());
}
