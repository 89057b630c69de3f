use super::*;
use crate::StageEvent;
use crate::sim::SimBackend;

struct Rig {
    arb: TextModeArbitrator,
    state: TextModeState,
    backend: SimBackend,
}

impl Rig {
    fn new() -> Self {
        let mut backend = SimBackend::new(1280.0, 800.0);
        let mut state = TextModeState::default();
        let arb = TextModeArbitrator::new(TextConfig::default(), &mut state, &mut backend).unwrap();
        Self {
            arb,
            state,
            backend,
        }
    }

    fn scroll(&mut self, phase: PillPhase, p: f64) {
        self.arb
            .on_scroll_progress(&mut self.state, phase, p, &mut self.backend)
            .unwrap();
    }

    fn force(&mut self) -> RequestOutcome {
        self.arb
            .force_default(&mut self.state, &mut self.backend)
            .unwrap()
    }

    fn request(&mut self, mode: TextMode) -> RequestOutcome {
        self.arb
            .request_mode(&mut self.state, mode, &mut self.backend)
            .unwrap()
    }

    fn default_opacity(&self) -> f64 {
        self.backend.opacity(ElementRole::DefaultCaption)
    }

    fn dynamic_opacity(&self) -> f64 {
        self.backend.opacity(ElementRole::DynamicCaption)
    }

    fn caption_text(&self) -> &str {
        &self.backend.element(ElementRole::DynamicCaption).unwrap().text
    }

    /// Run frames for `secs`, routing callbacks and checking that both captions are never
    /// visible together.
    fn run(&mut self, secs: f64) {
        let frames = (secs * 60.0).ceil() as usize;
        for _ in 0..frames {
            self.backend.step(1.0 / 60.0);
            while let Some(ev) = self.backend.next_event() {
                match ev {
                    StageEvent::Tween(ev) => {
                        // Errors abort the transition; tests that inject them assert on state.
                        let _ = self.arb.on_tween(&mut self.state, ev, &mut self.backend);
                    }
                    StageEvent::Timer(ev) => self.arb.on_timer(&mut self.state, ev),
                    _ => {}
                }
            }
            assert!(
                !(self.default_opacity() > 0.5 && self.dynamic_opacity() > 0.5),
                "both captions visible at t={}",
                self.backend.now_secs()
            );
            if !self.state.transition_in_flight {
                assert!(self.state.is_exclusive(), "settled state not exclusive");
            }
        }
    }

    /// Scroll into the band so the dynamic caption settles.
    fn settle_dynamic(&mut self) {
        self.scroll(PillPhase::Expanded, 0.3);
        self.run(0.7);
        assert_eq!(self.state.mode, TextMode::Dynamic);
    }
}

#[test]
fn starts_on_default() {
    let rig = Rig::new();
    assert_eq!(rig.state, TextModeState::default());
    assert_eq!(rig.default_opacity(), 1.0);
    assert_eq!(rig.dynamic_opacity(), 0.0);
    assert!(!rig.arb.is_transitioning());
}

#[test]
fn forward_progress_switches_to_dynamic() {
    let mut rig = Rig::new();
    rig.scroll(PillPhase::Expanded, 0.3);
    assert!(rig.arb.is_transitioning());
    assert!(rig.state.transition_in_flight);

    rig.run(0.7);
    assert_eq!(rig.state.mode, TextMode::Dynamic);
    assert!(rig.state.dynamic_visible && !rig.state.default_visible);
    assert!(!rig.state.transition_in_flight);
    assert_eq!(rig.state.dynamic_caption, Some(Direction::Forward));
    assert_eq!(rig.state.last_direction, Some(Direction::Forward));
    assert_eq!(rig.caption_text(), TextConfig::default().forward_caption);
    assert!((rig.dynamic_opacity() - 1.0).abs() < 1e-9);
    assert!(rig.default_opacity().abs() < 1e-9);
}

#[test]
fn zero_progress_stays_default() {
    let mut rig = Rig::new();
    rig.scroll(PillPhase::Expanded, 0.0);
    assert!(!rig.arb.is_transitioning());
    assert_eq!(rig.backend.launches().len(), 0);
}

#[test]
fn pill_phase_holds_default() {
    let mut rig = Rig::new();
    rig.scroll(PillPhase::Hidden, 0.5);
    rig.scroll(PillPhase::Disappearing, 0.6);
    assert_eq!(rig.state.mode, TextMode::Default);
    assert_eq!(rig.backend.launches().len(), 0);
}

#[test]
fn hidden_pill_returns_dynamic_to_default() {
    let mut rig = Rig::new();
    rig.settle_dynamic();
    rig.scroll(PillPhase::Hidden, 0.4);
    rig.run(0.7);
    assert_eq!(rig.state.mode, TextMode::Default);
    assert_eq!(rig.state.dynamic_caption, None);
    assert!(!rig.state.force_default_active);
}

#[test]
fn requests_during_transition_are_rejected() {
    let mut rig = Rig::new();
    assert_eq!(rig.request(TextMode::Dynamic), RequestOutcome::Started);
    assert_eq!(rig.request(TextMode::Default), RequestOutcome::Rejected);
    assert_eq!(rig.request(TextMode::Dynamic), RequestOutcome::Rejected);
    assert_eq!(rig.backend.launches().len(), 1);
}

#[test]
fn request_for_current_mode_settles() {
    let mut rig = Rig::new();
    assert_eq!(rig.request(TextMode::Default), RequestOutcome::Settled);
    assert!(!rig.arb.is_transitioning());
}

#[test]
fn direction_change_swaps_caption_text() {
    let mut rig = Rig::new();
    rig.settle_dynamic();

    rig.scroll(PillPhase::Expanded, 0.5);
    assert!(!rig.arb.is_transitioning(), "same caption needs no fade");

    rig.scroll(PillPhase::Expanded, 0.4);
    assert!(rig.arb.is_transitioning());
    rig.run(0.7);
    assert_eq!(rig.state.dynamic_caption, Some(Direction::Backward));
    assert_eq!(rig.caption_text(), TextConfig::default().backward_caption);
    assert_eq!(rig.state.mode, TextMode::Dynamic);
    assert!(
        (rig.backend
            .prop(ElementRole::DynamicCaption, Prop::CaptionOpacity)
            - 1.0)
            .abs()
            < 1e-9
    );
}

#[test]
fn leaving_band_hides_caption_text() {
    let mut rig = Rig::new();
    rig.settle_dynamic();
    rig.scroll(PillPhase::Expanded, 0.95);
    rig.run(0.4);
    assert_eq!(rig.state.dynamic_caption, None);
    assert_eq!(rig.state.mode, TextMode::Dynamic);
    assert!(
        rig.backend
            .prop(ElementRole::DynamicCaption, Prop::CaptionOpacity)
            .abs()
            < 1e-9
    );
}

#[test]
fn stalled_progress_reads_as_backward() {
    let mut rig = Rig::new();
    rig.settle_dynamic();
    rig.scroll(PillPhase::Expanded, 0.3);
    rig.run(0.7);
    assert_eq!(rig.state.dynamic_caption, Some(Direction::Backward));
}

#[test]
fn forced_default_from_dynamic_suspends_scroll_updates() {
    let mut rig = Rig::new();
    rig.settle_dynamic();

    assert_eq!(rig.force(), RequestOutcome::Started);
    rig.run(0.7);
    assert_eq!(rig.state.mode, TextMode::Default);
    assert!(rig.state.force_default_active);

    let launched = rig.backend.launches().len();
    rig.scroll(PillPhase::Expanded, 0.6);
    assert_eq!(rig.backend.launches().len(), launched);
    assert_eq!(rig.state.mode, TextMode::Default);
}

#[test]
fn forced_default_expires_after_release_window() {
    let mut rig = Rig::new();
    assert_eq!(rig.force(), RequestOutcome::Settled);
    assert!(rig.state.force_default_active);

    rig.run(1.9);
    assert!(rig.state.force_default_active);
    rig.run(0.2);
    assert!(!rig.state.force_default_active);

    rig.scroll(PillPhase::Expanded, 0.5);
    assert!(rig.arb.is_transitioning());
}

#[test]
fn repeated_force_while_active_merges() {
    let mut rig = Rig::new();
    assert_eq!(rig.force(), RequestOutcome::Settled);
    assert_eq!(rig.force(), RequestOutcome::Merged);
    assert_eq!(rig.backend.launches().len(), 0);
}

#[test]
fn force_during_fade_out_reroutes_to_default() {
    let mut rig = Rig::new();
    rig.scroll(PillPhase::Expanded, 0.3);
    rig.run(0.1);

    assert_eq!(rig.force(), RequestOutcome::Queued);
    assert_eq!(rig.force(), RequestOutcome::Merged);
    rig.run(0.8);

    assert_eq!(rig.state.mode, TextMode::Default);
    assert!(rig.state.force_default_active);
    assert!(rig.dynamic_opacity() < 1e-9);
    assert!(!rig.arb.is_transitioning());
}

#[test]
fn force_during_fade_in_runs_after_it() {
    let mut rig = Rig::new();
    rig.scroll(PillPhase::Expanded, 0.3);
    rig.run(0.35);
    assert!(rig.arb.is_transitioning());

    assert_eq!(rig.force(), RequestOutcome::Queued);
    rig.run(1.2);
    assert_eq!(rig.state.mode, TextMode::Default);
    assert!(rig.state.force_default_active);
    assert!(rig.default_opacity() > 0.99);
}

#[test]
fn release_drops_pending_activation() {
    let mut rig = Rig::new();
    rig.settle_dynamic();
    assert_eq!(rig.force(), RequestOutcome::Started);

    rig.arb.release_force(&mut rig.state, &mut rig.backend);
    rig.run(0.7);
    assert_eq!(rig.state.mode, TextMode::Default);
    assert!(!rig.state.force_default_active);
    assert_eq!(rig.backend.pending_timers(), 0);
}

#[test]
fn release_is_idempotent() {
    let mut rig = Rig::new();
    rig.force();
    rig.arb.release_force(&mut rig.state, &mut rig.backend);
    rig.arb.release_force(&mut rig.state, &mut rig.backend);
    assert!(!rig.state.force_default_active);
    rig.run(2.5);
    assert!(!rig.state.force_default_active);
}

#[test]
fn drifted_render_state_is_adopted() {
    let mut rig = Rig::new();
    rig.backend
        .poke(ElementRole::DefaultCaption, Prop::Opacity, 0.0);
    rig.backend
        .poke(ElementRole::DynamicCaption, Prop::Opacity, 1.0);

    assert_eq!(rig.request(TextMode::Dynamic), RequestOutcome::Settled);
    assert_eq!(rig.state.mode, TextMode::Dynamic);
    assert!(rig.state.is_exclusive());
}

#[test]
fn both_visible_resolves_to_default() {
    let mut rig = Rig::new();
    rig.backend
        .poke(ElementRole::DynamicCaption, Prop::Opacity, 1.0);

    assert_eq!(rig.request(TextMode::Default), RequestOutcome::Settled);
    assert_eq!(rig.state.mode, TextMode::Default);
    assert_eq!(rig.dynamic_opacity(), 0.0);
    assert_eq!(rig.default_opacity(), 1.0);
}

#[test]
fn neither_visible_resolves_to_default() {
    let mut rig = Rig::new();
    rig.backend
        .poke(ElementRole::DefaultCaption, Prop::Opacity, 0.1);

    assert_eq!(rig.request(TextMode::Dynamic), RequestOutcome::Started);
    assert_eq!(rig.default_opacity(), 1.0);
    rig.run(0.7);
    assert_eq!(rig.state.mode, TextMode::Dynamic);
}

#[test]
fn render_failure_releases_transition_guard() {
    let mut rig = Rig::new();
    rig.scroll(PillPhase::Expanded, 0.3);
    rig.backend.fail_render_writes(true);
    rig.run(0.4);
    assert!(!rig.arb.is_transitioning());
    assert!(!rig.state.transition_in_flight);

    rig.backend.fail_render_writes(false);
    assert_eq!(rig.request(TextMode::Dynamic), RequestOutcome::Started);
}

#[test]
fn missing_caption_is_reported() {
    let mut backend = SimBackend::new(1280.0, 800.0).without(ElementRole::DynamicCaption);
    let mut state = TextModeState::default();
    let err = TextModeArbitrator::new(TextConfig::default(), &mut state, &mut backend).unwrap_err();
    assert!(matches!(
        err,
        StageError::MissingTarget(ElementRole::DynamicCaption)
    ));
}
