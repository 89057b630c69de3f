use super::*;
use crate::animation::timers::Timers;
use crate::render::boundary::RenderBoundary;
use crate::sim::SimBackend;

fn fire_timers(backend: &mut SimBackend, sizer: &mut ResponsiveSpacerSizer, secs: f64) {
    backend.step(secs);
    while let Some(ev) = backend.next_event() {
        if let crate::StageEvent::Timer(t) = ev {
            sizer.on_timer(t, &mut *backend).unwrap();
        }
    }
}

#[test]
fn mobile_band_is_half_open() {
    let cfg = SpacerConfig::default();
    assert_eq!(spacer_height_vh(&cfg, 359.0), 125.0);
    assert_eq!(spacer_height_vh(&cfg, 360.0), 90.0);
    assert_eq!(spacer_height_vh(&cfg, 767.0), 90.0);
    assert_eq!(spacer_height_vh(&cfg, 768.0), 125.0);
    assert_eq!(spacer_height_vh(&cfg, 1920.0), 125.0);
}

#[test]
fn apply_pins_all_three_heights() {
    let mut backend = SimBackend::new(500.0, 800.0);
    let sizer = ResponsiveSpacerSizer::new(SpacerConfig::default(), &mut backend).unwrap();
    sizer.apply(&mut backend).unwrap();

    assert_eq!(
        backend.style(ElementRole::Spacer, "height"),
        Some(StyleValue::Vh(90.0))
    );
    assert_eq!(
        backend.style_priority(ElementRole::Spacer, "height"),
        Some(Priority::Important)
    );
    assert_eq!(
        backend.style(ElementRole::Spacer, "min-height"),
        Some(StyleValue::Vh(90.0))
    );
    assert_eq!(
        backend.style(ElementRole::Spacer, "max-height"),
        Some(StyleValue::Vh(90.0))
    );
}

#[test]
fn follow_releases_min_and_max() {
    let mut backend = SimBackend::new(1280.0, 800.0);
    let sizer = ResponsiveSpacerSizer::new(SpacerConfig::default(), &mut backend).unwrap();
    sizer.follow(&mut backend, 612.5).unwrap();

    assert_eq!(
        backend.style(ElementRole::Spacer, "height"),
        Some(StyleValue::Px(612.5))
    );
    assert_eq!(
        backend.style(ElementRole::Spacer, "min-height"),
        Some(StyleValue::Auto)
    );
    assert_eq!(
        backend.style(ElementRole::Spacer, "max-height"),
        Some(StyleValue::None)
    );
}

#[test]
fn resize_burst_applies_once_after_quiet_period() {
    let mut backend = SimBackend::new(1280.0, 800.0);
    let mut sizer = ResponsiveSpacerSizer::new(SpacerConfig::default(), &mut backend).unwrap();

    for width in [1000.0, 800.0, 600.0] {
        backend.set_viewport_width(width);
        sizer.on_resize(&mut backend);
        fire_timers(&mut backend, &mut sizer, 0.05);
        assert_eq!(backend.style(ElementRole::Spacer, "height"), None);
    }
    assert_eq!(backend.pending_timers(), 1);

    fire_timers(&mut backend, &mut sizer, 0.06);
    assert_eq!(
        backend.style(ElementRole::Spacer, "height"),
        Some(StyleValue::Vh(90.0))
    );
    assert_eq!(backend.element(ElementRole::Spacer).unwrap().style_writes, 3);
}

#[test]
fn foreign_timer_is_ignored() {
    let mut backend = SimBackend::new(1280.0, 800.0);
    let mut sizer = ResponsiveSpacerSizer::new(SpacerConfig::default(), &mut backend).unwrap();
    let h = backend.schedule(0.0, Cue::ResizeSettled);
    sizer
        .on_timer(
            TimerEvent {
                handle: h,
                cue: Cue::ResizeSettled,
            },
            &mut backend,
        )
        .unwrap();
    assert_eq!(backend.style(ElementRole::Spacer, "height"), None);
    assert!(backend.viewport_width() > 0.0);
}
