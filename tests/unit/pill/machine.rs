use super::*;
use crate::StageEvent;
use crate::sim::SimBackend;

struct Rig {
    machine: PillStateMachine,
    state: PillAnimationState,
    backend: SimBackend,
    bus: SignalBus,
}

impl Rig {
    fn new() -> Self {
        let mut backend = SimBackend::new(1280.0, 800.0);
        let machine = PillStateMachine::new(PillConfig::default(), &mut backend).unwrap();
        Self {
            machine,
            state: PillAnimationState::default(),
            backend,
            bus: SignalBus::default(),
        }
    }

    fn enter(&mut self) {
        self.machine
            .on_region_enter(&mut self.state, &mut self.backend)
            .unwrap();
    }

    fn enter_back(&mut self) {
        self.machine
            .on_region_enter_back(&mut self.state, &mut self.backend, &mut self.bus)
            .unwrap();
    }

    fn leave_back(&mut self) {
        self.machine
            .on_region_leave_back(&mut self.state, &mut self.backend, &mut self.bus)
            .unwrap();
    }

    fn run(&mut self, secs: f64) {
        let frames = (secs * 60.0).ceil() as usize;
        for _ in 0..frames {
            self.backend.step(1.0 / 60.0);
            while let Some(ev) = self.backend.next_event() {
                match ev {
                    StageEvent::Tween(ev) => self
                        .machine
                        .on_tween(&mut self.state, ev, &mut self.backend)
                        .unwrap(),
                    StageEvent::Timer(ev) => self.machine.on_timer(ev, &mut self.bus),
                    _ => {}
                }
            }
        }
    }

    fn y(&self) -> f64 {
        self.backend.prop(ElementRole::PillWrapper, Prop::Y)
    }

    fn displayed(&self) -> bool {
        self.backend.element(ElementRole::PillWrapper).unwrap().display
    }

    fn expanded(&self) -> bool {
        self.backend.has_class(ElementRole::PillWrapper, "expanded")
    }

    fn signals(&mut self) -> Vec<Signal> {
        self.bus.drain().into_iter().collect()
    }
}

#[test]
fn new_parks_pill_and_registers_region() {
    let rig = Rig::new();
    assert_eq!(rig.y(), 800.0);
    assert!(!rig.displayed());
    let region = &rig.backend.regions()[0];
    assert_eq!(region.id, RegionId::Pill);
    assert_eq!(region.trigger, ElementRole::MainSection);
    assert_eq!(region.scrub_secs, None);
}

#[test]
fn rise_walks_through_phases() {
    let mut rig = Rig::new();
    rig.enter();
    assert_eq!(rig.state.phase, PillPhase::Rising);
    assert!(rig.state.is_animating && !rig.state.is_reverse);
    assert!(rig.displayed());
    assert!(!rig.expanded());

    rig.run(0.5);
    assert_eq!(rig.state.phase, PillPhase::Rising);
    assert!(rig.y() < 800.0 && rig.y() > -120.0);

    rig.run(0.5);
    assert_eq!(rig.state.phase, PillPhase::Expanding);
    assert!(rig.expanded());
    assert!((rig.y() + 120.0).abs() < 1e-9);

    rig.run(1.2);
    assert_eq!(rig.state.phase, PillPhase::Expanded);
    assert!(!rig.state.is_animating);
    assert!((rig.backend.prop(ElementRole::PillWrapper, Prop::Opacity) - 1.0).abs() < 1e-9);
    assert_eq!(rig.backend.launch_count(Cue::RiseComplete), 1);
}

#[test]
fn leave_back_when_risen_plays_disappear() {
    let mut rig = Rig::new();
    rig.enter();
    rig.run(2.2);
    rig.signals();

    rig.leave_back();
    assert_eq!(rig.state.phase, PillPhase::Disappearing);
    assert!(rig.state.is_animating && rig.state.is_reverse);
    assert!(!rig.expanded());
    assert_eq!(rig.signals(), vec![Signal::ForceDefaultText]);

    rig.run(1.1);
    assert_eq!(rig.state.phase, PillPhase::Hidden);
    assert!(!rig.state.is_animating);
    assert!(!rig.displayed());
    assert!((rig.y() - 800.0).abs() < 1e-9);
    assert!((rig.backend.prop(ElementRole::PillWrapper, Prop::Opacity) - 0.7).abs() < 1e-9);
}

#[test]
fn leave_back_during_early_rise_vanishes() {
    let mut rig = Rig::new();
    rig.enter();
    rig.run(0.2);
    assert!(rig.y() > -100.0);

    rig.leave_back();
    assert_eq!(rig.state.phase, PillPhase::Hidden);
    assert!(!rig.state.is_animating);
    assert!(!rig.displayed());
    assert_eq!(rig.y(), 800.0);
    assert_eq!(rig.backend.live_timelines(), 0);

    rig.run(2.5);
    assert_eq!(rig.state.phase, PillPhase::Hidden);
    assert!(!rig.expanded());
    assert_eq!(rig.backend.launch_count(Cue::DisappearComplete), 0);
}

#[test]
fn leave_back_schedules_retry() {
    let mut rig = Rig::new();
    rig.enter();
    rig.leave_back();
    assert_eq!(rig.signals(), vec![Signal::ForceDefaultText]);

    rig.run(0.15);
    assert_eq!(rig.signals(), vec![Signal::ForceDefaultText]);
    rig.run(0.5);
    assert!(rig.signals().is_empty());
}

#[test]
fn enter_cancels_pending_retry() {
    let mut rig = Rig::new();
    rig.enter();
    rig.leave_back();
    rig.signals();
    rig.enter();
    rig.run(0.3);
    assert!(rig.signals().is_empty());
}

#[test]
fn enter_back_during_disappear_restarts_rise() {
    let mut rig = Rig::new();
    rig.enter();
    rig.run(2.2);
    rig.leave_back();
    rig.run(0.3);
    rig.signals();

    rig.enter_back();
    assert_eq!(rig.signals(), vec![Signal::ReleaseForcedDefault]);
    assert_eq!(rig.state.phase, PillPhase::Rising);
    assert_eq!(rig.backend.launch_count(Cue::RiseComplete), 2);

    rig.run(2.2);
    assert_eq!(rig.state.phase, PillPhase::Expanded);
    assert!(rig.displayed());
    assert_eq!(rig.backend.live_timelines(), 0);
}

#[test]
fn enter_back_when_expanded_only_releases_text() {
    let mut rig = Rig::new();
    rig.enter();
    rig.run(2.2);
    rig.signals();

    rig.enter_back();
    assert_eq!(rig.signals(), vec![Signal::ReleaseForcedDefault]);
    assert_eq!(rig.state.phase, PillPhase::Expanded);
    assert_eq!(rig.backend.launch_count(Cue::RiseComplete), 1);
}

#[test]
fn enter_back_when_hidden_starts_rise() {
    let mut rig = Rig::new();
    rig.enter_back();
    assert_eq!(rig.state.phase, PillPhase::Rising);
    assert!(rig.displayed());
}

#[test]
fn repeated_enter_keeps_one_rise() {
    let mut rig = Rig::new();
    rig.enter();
    rig.run(0.3);
    rig.enter();
    assert_eq!(rig.backend.live_timelines(), 1);
    assert_eq!(rig.y(), 800.0);
    rig.run(2.2);
    assert_eq!(rig.state.phase, PillPhase::Expanded);
}

#[test]
fn foreign_cue_is_ignored() {
    let mut rig = Rig::new();
    rig.enter();
    rig.machine
        .on_tween(
            &mut rig.state,
            TweenEvent {
                handle: TweenHandle(9_999),
                cue: Cue::RiseComplete,
            },
            &mut rig.backend,
        )
        .unwrap();
    assert_eq!(rig.state.phase, PillPhase::Rising);
    assert!(rig.state.is_animating);
}

#[test]
fn missing_pill_is_reported() {
    let mut backend = SimBackend::new(1280.0, 800.0).without(ElementRole::PillWrapper);
    let err = PillStateMachine::new(PillConfig::default(), &mut backend).unwrap_err();
    assert!(err.is_missing_target());
}
