use crate::animation::timers::{TimerEvent, TimerHandle};
use crate::animation::tween::{Cue, Prop, Props, TweenEvent, TweenHandle, TweenSpec};
use crate::config::TextConfig;
use crate::foundation::core::{Direction, ElementRef, ElementRole, ScrollProgress};
use crate::foundation::error::{StageError, StageResult};
use crate::pill::state::PillPhase;
use crate::stage::backend::Backend;
use crate::text::state::{TextMode, TextModeState};

/// What happened to a caption mode request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A transition was started.
    Started,
    /// The requested mode was already showing; nothing to animate.
    Settled,
    /// Dropped because another transition is in flight.
    Rejected,
    /// Forced request waiting for the running fade step to finish.
    Queued,
    /// Forced request folded into an identical one already pending or active.
    Merged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransitionKind {
    /// Swap the visible caption slot.
    Mode(TextMode),
    /// Swap the caption text inside the dynamic slot; `None` hides it.
    Caption(Option<Direction>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    FadingOut,
    FadingIn,
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    kind: TransitionKind,
    step: Step,
    handle: TweenHandle,
    forced: bool,
}

/// Keeps exactly one of the two captions visible and serializes every change.
///
/// Each transition is a fade-out followed by a fade-in; the suspension between them is
/// the `step` of the in-flight transition. At most one transition runs at a time.
#[derive(Debug)]
pub struct TextModeArbitrator {
    cfg: TextConfig,
    default_el: ElementRef,
    dynamic_el: ElementRef,
    previous_progress: f64,
    latest: ScrollProgress,
    transition: Option<Transition>,
    queued_force: bool,
    release_timer: Option<TimerHandle>,
}

impl TextModeArbitrator {
    /// Resolve both captions and show the default one.
    pub fn new(
        cfg: TextConfig,
        state: &mut TextModeState,
        backend: &mut dyn Backend,
    ) -> StageResult<Self> {
        let default_el = backend
            .resolve(ElementRole::DefaultCaption)
            .ok_or(StageError::MissingTarget(ElementRole::DefaultCaption))?;
        let dynamic_el = backend
            .resolve(ElementRole::DynamicCaption)
            .ok_or(StageError::MissingTarget(ElementRole::DynamicCaption))?;

        backend.set(default_el, &Props::new().with(Prop::Opacity, 1.0));
        backend.set(
            dynamic_el,
            &Props::new()
                .with(Prop::Opacity, 0.0)
                .with(Prop::CaptionOpacity, 0.0),
        );
        *state = TextModeState::default();

        Ok(Self {
            cfg,
            default_el,
            dynamic_el,
            previous_progress: 0.0,
            latest: ScrollProgress::new(0.0, 0.0),
            transition: None,
            queued_force: false,
            release_timer: None,
        })
    }

    /// Whether a fade sequence is running.
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Consume one scale-region progress sample, in delivery order.
    pub fn on_scroll_progress(
        &mut self,
        state: &mut TextModeState,
        phase: PillPhase,
        progress: f64,
        backend: &mut dyn Backend,
    ) -> StageResult<()> {
        let pair = ScrollProgress::new(progress, self.previous_progress);
        self.previous_progress = pair.current;
        self.latest = pair;

        if state.force_default_active {
            tracing::trace!("forced default active, scroll update ignored");
            return Ok(());
        }
        if phase.holds_default_text() {
            if state.mode == TextMode::Dynamic {
                self.request_mode(state, TextMode::Default, backend)?;
            }
            return Ok(());
        }
        if state.mode == TextMode::Default {
            if pair.current > self.cfg.mode_threshold {
                self.request_mode(state, TextMode::Dynamic, backend)?;
            }
            return Ok(());
        }
        self.update_caption(state, pair, backend)
    }

    /// Non-forced mode switch. Rejected while any transition is in flight.
    pub fn request_mode(
        &mut self,
        state: &mut TextModeState,
        target: TextMode,
        backend: &mut dyn Backend,
    ) -> StageResult<RequestOutcome> {
        if self.transition.is_some() {
            tracing::debug!(?target, "caption transition in flight, request rejected");
            return Ok(RequestOutcome::Rejected);
        }
        self.guarded(state, backend, |this, state, backend| {
            this.begin(state, target, false, backend)
        })
    }

    /// Forced switch to Default. Never rejected: it queues behind the running fade step.
    pub fn force_default(
        &mut self,
        state: &mut TextModeState,
        backend: &mut dyn Backend,
    ) -> StageResult<RequestOutcome> {
        if let Some(t) = self.transition {
            if t.forced && t.kind == TransitionKind::Mode(TextMode::Default) {
                tracing::debug!("forced default already in flight, merged");
                return Ok(RequestOutcome::Merged);
            }
            if self.queued_force {
                return Ok(RequestOutcome::Merged);
            }
            self.queued_force = true;
            tracing::debug!("forced default queued behind running fade");
            return Ok(RequestOutcome::Queued);
        }
        if state.force_default_active && state.mode == TextMode::Default {
            tracing::debug!("forced default already active");
            return Ok(RequestOutcome::Merged);
        }
        self.guarded(state, backend, |this, state, backend| {
            this.begin(state, TextMode::Default, true, backend)
        })
    }

    /// Drop the forced override now. Idempotent.
    pub fn release_force(&mut self, state: &mut TextModeState, backend: &mut dyn Backend) {
        self.queued_force = false;
        if let Some(t) = self.transition.as_mut() {
            t.forced = false;
        }
        if let Some(h) = self.release_timer.take() {
            backend.cancel_timer(h);
        }
        if state.force_default_active {
            state.force_default_active = false;
            tracing::info!("forced default released");
        }
    }

    /// Route a fade cue. Cues of fades this arbitrator no longer owns are ignored.
    pub fn on_tween(
        &mut self,
        state: &mut TextModeState,
        ev: TweenEvent,
        backend: &mut dyn Backend,
    ) -> StageResult<()> {
        let Some(t) = self.transition.filter(|t| t.handle == ev.handle) else {
            tracing::debug!(cue = ?ev.cue, handle = ev.handle.0, "stale caption cue ignored");
            return Ok(());
        };
        self.guarded(state, backend, |this, state, backend| {
            this.advance(state, t, ev.cue, backend)
        })
        .map(|_| ())
    }

    /// Route a timer cue.
    pub fn on_timer(&mut self, state: &mut TextModeState, ev: TimerEvent) {
        if ev.cue != Cue::ForceDefaultRelease || self.release_timer != Some(ev.handle) {
            return;
        }
        self.release_timer = None;
        // An explicit release may already have cleared the flag.
        if state.force_default_active {
            state.force_default_active = false;
            tracing::info!("forced default expired");
        }
    }

    /// Run `f`; if it fails, abandon any half-started transition so the guard cannot stay
    /// stuck, re-derive visibility from the rendered captions, then return the error.
    fn guarded<F>(
        &mut self,
        state: &mut TextModeState,
        backend: &mut dyn Backend,
        f: F,
    ) -> StageResult<RequestOutcome>
    where
        F: FnOnce(&mut Self, &mut TextModeState, &mut dyn Backend) -> StageResult<RequestOutcome>,
    {
        let res = f(self, state, backend);
        if res.is_err() {
            if let Some(t) = self.transition.take() {
                backend.cancel(t.handle);
            }
            self.queued_force = false;
            state.transition_in_flight = false;
            if let Err(err) = self.reconcile(state, backend) {
                tracing::warn!(%err, "caption reconciliation after failure failed");
            }
        }
        res
    }

    fn begin(
        &mut self,
        state: &mut TextModeState,
        target: TextMode,
        forced: bool,
        backend: &mut dyn Backend,
    ) -> StageResult<RequestOutcome> {
        self.reconcile(state, backend)?;
        if state.mode == target {
            if forced {
                self.activate_force(state, backend);
            }
            return Ok(RequestOutcome::Settled);
        }

        let (el, secs) = match state.mode {
            TextMode::Default => (self.default_el, self.cfg.default_fade_out_secs),
            TextMode::Dynamic => (self.dynamic_el, self.cfg.dynamic_fade_out_secs),
        };
        let handle = backend.animate(
            TweenSpec::to(el, Props::new().with(Prop::Opacity, 0.0), secs, self.cfg.ease)
                .on_complete(Cue::TextFadeOut),
        );
        self.transition = Some(Transition {
            kind: TransitionKind::Mode(target),
            step: Step::FadingOut,
            handle,
            forced,
        });
        state.transition_in_flight = true;
        tracing::debug!(?target, forced, "caption mode transition started");
        Ok(RequestOutcome::Started)
    }

    fn advance(
        &mut self,
        state: &mut TextModeState,
        t: Transition,
        cue: Cue,
        backend: &mut dyn Backend,
    ) -> StageResult<RequestOutcome> {
        match (t.kind, t.step, cue) {
            (TransitionKind::Mode(target), Step::FadingOut, Cue::TextFadeOut) => {
                match state.mode {
                    TextMode::Default => state.default_visible = false,
                    TextMode::Dynamic => state.dynamic_visible = false,
                }
                if self.queued_force {
                    self.queued_force = false;
                    self.fade_in_slot(state, TextMode::Default, true, backend)?;
                } else {
                    self.fade_in_slot(state, target, t.forced, backend)?;
                }
                Ok(RequestOutcome::Started)
            }
            (TransitionKind::Mode(target), Step::FadingIn, Cue::TextFadeIn) => {
                self.finish_mode(state, target, t.forced, backend)
            }
            (TransitionKind::Caption(target), Step::FadingOut, Cue::CaptionFadeOut) => {
                state.dynamic_caption = None;
                match target {
                    Some(dir) if !self.queued_force => {
                        self.fade_in_caption(state, dir, backend)?;
                        Ok(RequestOutcome::Started)
                    }
                    _ => self.finish_caption(state, None, backend),
                }
            }
            (TransitionKind::Caption(target), Step::FadingIn, Cue::CaptionFadeIn) => {
                self.finish_caption(state, target, backend)
            }
            (kind, step, cue) => {
                tracing::debug!(?kind, ?step, ?cue, "unexpected caption cue ignored");
                Ok(RequestOutcome::Settled)
            }
        }
    }

    fn fade_in_slot(
        &mut self,
        state: &mut TextModeState,
        target: TextMode,
        forced: bool,
        backend: &mut dyn Backend,
    ) -> StageResult<()> {
        let el = match target {
            TextMode::Default => self.default_el,
            TextMode::Dynamic => {
                // Text is swapped only now, while the slot is fully faded out.
                let dir = self.latest.direction();
                let shown = self.in_band(self.latest.current);
                backend.set_text(self.dynamic_el, self.caption_text(dir))?;
                backend.set(
                    self.dynamic_el,
                    &Props::new().with(Prop::CaptionOpacity, if shown { 1.0 } else { 0.0 }),
                );
                state.last_direction = Some(dir);
                state.dynamic_caption = shown.then_some(dir);
                self.dynamic_el
            }
        };
        let handle = backend.animate(
            TweenSpec::to(
                el,
                Props::new().with(Prop::Opacity, 1.0),
                self.cfg.fade_in_secs,
                self.cfg.ease,
            )
            .on_complete(Cue::TextFadeIn),
        );
        self.transition = Some(Transition {
            kind: TransitionKind::Mode(target),
            step: Step::FadingIn,
            handle,
            forced,
        });
        Ok(())
    }

    fn finish_mode(
        &mut self,
        state: &mut TextModeState,
        target: TextMode,
        forced: bool,
        backend: &mut dyn Backend,
    ) -> StageResult<RequestOutcome> {
        self.transition = None;
        state.transition_in_flight = false;
        state.show_only(target);
        if target == TextMode::Default {
            state.dynamic_caption = None;
            backend.set(
                self.dynamic_el,
                &Props::new().with(Prop::CaptionOpacity, 0.0),
            );
        }
        self.reconcile(state, backend)?;
        tracing::debug!(mode = ?state.mode, forced, "caption mode transition complete");

        if forced {
            self.activate_force(state, backend);
        }
        self.run_queued_force(state, backend)
    }

    fn update_caption(
        &mut self,
        state: &mut TextModeState,
        pair: ScrollProgress,
        backend: &mut dyn Backend,
    ) -> StageResult<()> {
        if self.transition.is_some() {
            tracing::debug!("caption transition in flight, update rejected");
            return Ok(());
        }
        let want = self.in_band(pair.current).then_some(pair.direction());
        if want == state.dynamic_caption {
            return Ok(());
        }

        self.guarded(state, backend, |this, state, backend| {
            if state.dynamic_caption.is_some() {
                let handle = backend.animate(
                    TweenSpec::to(
                        this.dynamic_el,
                        Props::new().with(Prop::CaptionOpacity, 0.0),
                        this.cfg.dynamic_fade_out_secs,
                        this.cfg.ease,
                    )
                    .on_complete(Cue::CaptionFadeOut),
                );
                this.transition = Some(Transition {
                    kind: TransitionKind::Caption(want),
                    step: Step::FadingOut,
                    handle,
                    forced: false,
                });
                state.transition_in_flight = true;
            } else if let Some(dir) = want {
                this.fade_in_caption(state, dir, backend)?;
            }
            Ok(RequestOutcome::Started)
        })
        .map(|_| ())
    }

    fn fade_in_caption(
        &mut self,
        state: &mut TextModeState,
        dir: Direction,
        backend: &mut dyn Backend,
    ) -> StageResult<()> {
        backend.set_text(self.dynamic_el, self.caption_text(dir))?;
        let handle = backend.animate(
            TweenSpec::to(
                self.dynamic_el,
                Props::new().with(Prop::CaptionOpacity, 1.0),
                self.cfg.fade_in_secs,
                self.cfg.ease,
            )
            .on_complete(Cue::CaptionFadeIn),
        );
        state.last_direction = Some(dir);
        self.transition = Some(Transition {
            kind: TransitionKind::Caption(Some(dir)),
            step: Step::FadingIn,
            handle,
            forced: false,
        });
        state.transition_in_flight = true;
        Ok(())
    }

    fn finish_caption(
        &mut self,
        state: &mut TextModeState,
        shown: Option<Direction>,
        backend: &mut dyn Backend,
    ) -> StageResult<RequestOutcome> {
        self.transition = None;
        state.transition_in_flight = false;
        state.dynamic_caption = shown;
        tracing::debug!(caption = ?shown, "caption updated");
        self.run_queued_force(state, backend)
    }

    fn run_queued_force(
        &mut self,
        state: &mut TextModeState,
        backend: &mut dyn Backend,
    ) -> StageResult<RequestOutcome> {
        if !self.queued_force {
            return Ok(RequestOutcome::Settled);
        }
        self.queued_force = false;
        self.begin(state, TextMode::Default, true, backend)
    }

    fn activate_force(&mut self, state: &mut TextModeState, backend: &mut dyn Backend) {
        state.force_default_active = true;
        if let Some(h) = self.release_timer.take() {
            backend.cancel_timer(h);
        }
        self.release_timer =
            Some(backend.schedule(self.cfg.force_release_secs, Cue::ForceDefaultRelease));
        tracing::info!(
            release_secs = self.cfg.force_release_secs,
            "forced default active"
        );
    }

    /// Re-derive slot visibility from rendered opacity; both or neither visible resolves
    /// to Default.
    fn reconcile(&mut self, state: &mut TextModeState, backend: &mut dyn Backend) -> StageResult<()> {
        let threshold = self.cfg.visible_opacity;
        let default_seen = backend.computed_opacity(self.default_el)? > threshold;
        let dynamic_seen = backend.computed_opacity(self.dynamic_el)? > threshold;

        match (default_seen, dynamic_seen) {
            (true, false) => state.show_only(TextMode::Default),
            (false, true) => state.show_only(TextMode::Dynamic),
            _ => {
                tracing::warn!(
                    default_seen,
                    dynamic_seen,
                    "caption visibility anomaly, resolving to default"
                );
                backend.set(self.default_el, &Props::new().with(Prop::Opacity, 1.0));
                backend.set(
                    self.dynamic_el,
                    &Props::new()
                        .with(Prop::Opacity, 0.0)
                        .with(Prop::CaptionOpacity, 0.0),
                );
                state.show_only(TextMode::Default);
                state.dynamic_caption = None;
            }
        }
        Ok(())
    }

    fn in_band(&self, progress: f64) -> bool {
        progress > self.cfg.band_start && progress < self.cfg.band_end
    }

    fn caption_text(&self, dir: Direction) -> &str {
        match dir {
            Direction::Forward => &self.cfg.forward_caption,
            Direction::Backward => &self.cfg.backward_caption,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/arbitrator.rs"]
mod tests;
