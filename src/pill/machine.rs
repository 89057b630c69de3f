use crate::animation::timers::{TimerEvent, TimerHandle};
use crate::animation::tween::{Cue, Prop, Props, TimelineSpec, TweenEvent, TweenHandle, TweenSpec};
use crate::config::PillConfig;
use crate::foundation::core::{ElementRef, ElementRole, RegionId};
use crate::foundation::error::{StageError, StageResult};
use crate::pill::state::{PillAnimationState, PillPhase};
use crate::scroll::region::{Boundary, RegionSpec};
use crate::stage::backend::Backend;
use crate::stage::bus::{Signal, SignalBus};

/// Drives the pill through `Hidden -> Rising -> Expanding -> Expanded -> Disappearing`.
///
/// Only one of the rise and disappear timelines is ever live; starting one cancels the
/// other first.
#[derive(Debug)]
pub struct PillStateMachine {
    cfg: PillConfig,
    pill: ElementRef,
    rise: Option<TweenHandle>,
    disappear: Option<TweenHandle>,
    retry: Option<TimerHandle>,
}

impl PillStateMachine {
    /// Resolve the pill, park it off-screen and register the pill region.
    pub fn new(cfg: PillConfig, backend: &mut dyn Backend) -> StageResult<Self> {
        let pill = backend
            .resolve(ElementRole::PillWrapper)
            .ok_or(StageError::MissingTarget(ElementRole::PillWrapper))?;

        backend.set(pill, &Props::new().with(Prop::Y, cfg.initial_y));
        backend.set_display(pill, false)?;
        backend.register(RegionSpec {
            id: RegionId::Pill,
            trigger: ElementRole::MainSection,
            start: Boundary::TOP_TOP,
            end: Boundary::BOTTOM_TOP,
            scrub_secs: None,
            pin: false,
        });

        Ok(Self {
            cfg,
            pill,
            rise: None,
            disappear: None,
            retry: None,
        })
    }

    /// Region entered scrolling forward: reset and (re)start the rise.
    pub fn on_region_enter(
        &mut self,
        state: &mut PillAnimationState,
        backend: &mut dyn Backend,
    ) -> StageResult<()> {
        if let Some(h) = self.disappear.take() {
            tracing::debug!("region enter interrupts disappear");
            backend.cancel(h);
        }
        if let Some(h) = self.rise.take() {
            backend.cancel(h);
        }
        if let Some(t) = self.retry.take() {
            backend.cancel_timer(t);
        }

        backend.set(
            self.pill,
            &Props::new()
                .with(Prop::Y, self.cfg.initial_y)
                .with(Prop::Opacity, self.cfg.start_opacity),
        );
        backend.set_display(self.pill, true)?;
        backend.toggle_class(self.pill, &self.cfg.expanded_class, false)?;
        state.transform_handoff_done = false;

        self.start_rise(state, backend);
        Ok(())
    }

    /// Region re-entered scrolling backward from below its end.
    pub fn on_region_enter_back(
        &mut self,
        state: &mut PillAnimationState,
        backend: &mut dyn Backend,
        bus: &mut SignalBus,
    ) -> StageResult<()> {
        bus.post(Signal::ReleaseForcedDefault);
        if let Some(t) = self.retry.take() {
            backend.cancel_timer(t);
        }

        if state.phase == PillPhase::Disappearing {
            if let Some(h) = self.disappear.take() {
                backend.cancel(h);
            }
            state.is_animating = false;
            state.is_reverse = false;
            state.phase = PillPhase::Hidden;
            tracing::debug!("enter-back cancelled disappear");
        }

        if state.phase == PillPhase::Hidden {
            return self.on_region_enter(state, backend);
        }
        Ok(())
    }

    /// Region left scrolling backward past its start: disappear or vanish.
    pub fn on_region_leave_back(
        &mut self,
        state: &mut PillAnimationState,
        backend: &mut dyn Backend,
        bus: &mut SignalBus,
    ) -> StageResult<()> {
        if state.is_rising() {
            tracing::debug!("leave-back interrupts rise");
            if let Some(h) = self.rise.take() {
                backend.cancel(h);
            }
            state.is_animating = false;
        }

        // Forcing Default text does not depend on the pill branch below.
        bus.post(Signal::ForceDefaultText);
        if let Some(t) = self.retry.take() {
            backend.cancel_timer(t);
        }
        self.retry = Some(backend.schedule(self.cfg.force_retry_secs, Cue::ForceDefaultRetry));

        let y = backend.get(self.pill, Prop::Y);
        if y <= self.cfg.disappear_threshold_y {
            self.start_disappear(state, backend)
        } else {
            self.vanish(state, backend)
        }
    }

    /// Route a tween cue. Cues from timelines this machine no longer owns are ignored.
    pub fn on_tween(
        &mut self,
        state: &mut PillAnimationState,
        ev: TweenEvent,
        backend: &mut dyn Backend,
    ) -> StageResult<()> {
        let from_rise = self.rise == Some(ev.handle);
        let from_disappear = self.disappear == Some(ev.handle);

        match ev.cue {
            Cue::RiseLifted if from_rise => {
                state.phase = PillPhase::Expanding;
            }
            Cue::ExpandStart if from_rise => {
                backend.toggle_class(self.pill, &self.cfg.expanded_class, true)?;
            }
            Cue::RiseComplete if from_rise => {
                self.rise = None;
                state.is_animating = false;
                state.phase = PillPhase::Expanded;
                tracing::info!("pill rise complete");
            }
            Cue::DisappearComplete if from_disappear => {
                self.disappear = None;
                state.is_animating = false;
                state.is_reverse = false;
                state.phase = PillPhase::Hidden;
                backend.set_display(self.pill, false)?;
                backend.toggle_class(self.pill, &self.cfg.expanded_class, false)?;
                tracing::info!("pill disappear complete");
            }
            cue => {
                tracing::debug!(?cue, handle = ev.handle.0, "stale pill cue ignored");
            }
        }
        Ok(())
    }

    /// Route a timer cue.
    pub fn on_timer(&mut self, ev: TimerEvent, bus: &mut SignalBus) {
        if ev.cue == Cue::ForceDefaultRetry && self.retry == Some(ev.handle) {
            self.retry = None;
            bus.post(Signal::ForceDefaultText);
        }
    }

    fn start_rise(&mut self, state: &mut PillAnimationState, backend: &mut dyn Backend) {
        let c = &self.cfg;
        let lift = TweenSpec::to(
            self.pill,
            Props::new()
                .with(Prop::Y, c.final_y)
                .with(Prop::Opacity, c.risen_opacity),
            c.rise_secs,
            c.rise_ease,
        )
        .starting_at(
            Props::new()
                .with(Prop::Y, c.initial_y)
                .with(Prop::Opacity, c.start_opacity),
        )
        .on_complete(Cue::RiseLifted);
        let expand = TweenSpec::to(self.pill, Props::new(), c.expand_secs, c.expand_ease)
            .on_start(Cue::ExpandStart);

        let timeline = TimelineSpec::default()
            .at(0.0, lift)
            .at(c.rise_secs, expand)
            .on_complete(Cue::RiseComplete);

        state.is_animating = true;
        state.is_reverse = false;
        state.phase = PillPhase::Rising;
        self.rise = Some(backend.sequence(timeline));
        tracing::info!("pill rise started");
    }

    fn start_disappear(
        &mut self,
        state: &mut PillAnimationState,
        backend: &mut dyn Backend,
    ) -> StageResult<()> {
        if let Some(h) = self.disappear.take() {
            backend.cancel(h);
        }
        let c = &self.cfg;
        backend.toggle_class(self.pill, &c.expanded_class, false)?;

        let contract = TweenSpec::to(self.pill, Props::new(), c.contract_secs, c.disappear_ease);
        let descend = TweenSpec::to(
            self.pill,
            Props::new()
                .with(Prop::Y, c.disappear_y)
                .with(Prop::Opacity, c.disappear_opacity),
            c.descent_secs,
            c.disappear_ease,
        );
        let timeline = TimelineSpec::default()
            .at(0.0, contract)
            .at(c.descent_offset_secs, descend)
            .on_complete(Cue::DisappearComplete);

        state.is_animating = true;
        state.is_reverse = true;
        state.phase = PillPhase::Disappearing;
        self.disappear = Some(backend.sequence(timeline));
        tracing::info!("pill disappear started");
        Ok(())
    }

    fn vanish(
        &mut self,
        state: &mut PillAnimationState,
        backend: &mut dyn Backend,
    ) -> StageResult<()> {
        if let Some(h) = self.disappear.take() {
            backend.cancel(h);
        }
        backend.set(self.pill, &Props::new().with(Prop::Y, self.cfg.initial_y));
        backend.set_display(self.pill, false)?;
        backend.toggle_class(self.pill, &self.cfg.expanded_class, false)?;
        state.is_animating = false;
        state.is_reverse = false;
        state.phase = PillPhase::Hidden;
        tracing::debug!("pill below threshold, hidden without animation");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pill/machine.rs"]
mod tests;
