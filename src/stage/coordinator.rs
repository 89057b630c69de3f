use crate::animation::timers::TimerEvent;
use crate::animation::tween::{Cue, TweenEvent};
use crate::config::StageConfig;
use crate::foundation::core::{ElementRole, RegionId};
use crate::foundation::error::StageResult;
use crate::handoff::controller::TransformHandoffController;
use crate::layout::mockup::MockupScaler;
use crate::layout::spacer::ResponsiveSpacerSizer;
use crate::pill::machine::PillStateMachine;
use crate::pill::state::{PillAnimationState, PillPhase};
use crate::scroll::region::{Boundary, RegionSpec, ScrollEvent};
use crate::stage::backend::Backend;
use crate::stage::bus::{Signal, SignalBus};
use crate::text::arbitrator::{RequestOutcome, TextModeArbitrator};
use crate::text::state::TextModeState;

/// Callback delivered to the stage by its host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StageEvent {
    /// Scroll observer callback for a registered region.
    Scroll {
        /// Region the callback belongs to.
        region: RegionId,
        /// The callback.
        event: ScrollEvent,
    },
    /// Tween engine cue.
    Tween(TweenEvent),
    /// Timer expiry.
    Timer(TimerEvent),
    /// Viewport resized (raw, not debounced).
    Resize,
}

/// Which subsystems initialized at bootstrap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubsystemStatus {
    /// Responsive spacer sizer.
    pub spacer: bool,
    /// Caption arbitration.
    pub text: bool,
    /// Mockup scale and height effect.
    pub mockup: bool,
    /// Pill phase machine.
    pub pill: bool,
    /// Transform handoff.
    pub handoff: bool,
}

/// Mediator owning both state objects, every controller and the host backend.
///
/// All mutation happens inside [`Stage::dispatch`]; controllers talk to each other only
/// through signals the stage drains after each handler.
#[derive(Debug)]
pub struct Stage<B: Backend> {
    backend: B,
    pill_state: PillAnimationState,
    text_state: TextModeState,
    spacer: Option<ResponsiveSpacerSizer>,
    text: Option<TextModeArbitrator>,
    mockup: Option<MockupScaler>,
    pill: Option<PillStateMachine>,
    handoff: Option<TransformHandoffController>,
    bus: SignalBus,
}

impl<B: Backend> Stage<B> {
    /// Validate `cfg` and bring up every subsystem in page order: spacer (with one
    /// immediate apply), captions, mockup, pill, handoff.
    ///
    /// A subsystem whose elements are missing is disabled with a warning; the others run.
    #[tracing::instrument(skip_all)]
    pub fn bootstrap(cfg: StageConfig, mut backend: B) -> StageResult<Self> {
        cfg.validate()?;
        let StageConfig {
            pill,
            text,
            handoff,
            mockup,
            spacer,
        } = cfg;

        let spacer = enabled("spacer", ResponsiveSpacerSizer::new(spacer, &mut backend));
        if let Some(s) = &spacer {
            report("spacer", s.apply(&mut backend));
        }

        let mut text_state = TextModeState::default();
        let text = enabled(
            "text",
            TextModeArbitrator::new(text, &mut text_state, &mut backend),
        );
        let mockup = enabled("mockup", MockupScaler::new(mockup, &mut backend));
        let section = backend.resolve(ElementRole::DeviceSection);
        if section.is_none() {
            tracing::warn!("device section missing, scale region not registered");
        } else if text.is_some() || mockup.is_some() {
            backend.register(RegionSpec {
                id: RegionId::Scale,
                trigger: ElementRole::DeviceSection,
                start: Boundary::TOP_TOP,
                end: Boundary::AfterStartVh(400.0),
                scrub_secs: Some(1.0),
                pin: true,
            });
        }

        let pill = enabled("pill", PillStateMachine::new(pill, &mut backend));
        let handoff = enabled(
            "handoff",
            TransformHandoffController::new(handoff, &mut backend),
        );

        let stage = Self {
            backend,
            pill_state: PillAnimationState::default(),
            text_state,
            spacer,
            text,
            mockup,
            pill,
            handoff,
            bus: SignalBus::default(),
        };
        tracing::info!(status = ?stage.status(), "stage bootstrapped");
        Ok(stage)
    }

    /// Which subsystems are running.
    pub fn status(&self) -> SubsystemStatus {
        SubsystemStatus {
            spacer: self.spacer.is_some(),
            text: self.text.is_some(),
            mockup: self.mockup.is_some(),
            pill: self.pill.is_some(),
            handoff: self.handoff.is_some(),
        }
    }

    /// Pill animation state.
    pub fn pill_state(&self) -> &PillAnimationState {
        &self.pill_state
    }

    /// Caption arbitration state.
    pub fn text_state(&self) -> &TextModeState {
        &self.text_state
    }

    /// Whether a caption fade sequence is running.
    pub fn text_transitioning(&self) -> bool {
        self.text.as_ref().is_some_and(TextModeArbitrator::is_transitioning)
    }

    /// Whether the mockup height reduction has been scheduled or run.
    pub fn mockup_height_reduced(&self) -> bool {
        self.mockup.as_ref().is_some_and(MockupScaler::height_reduced)
    }

    /// Host backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Host backend, mutably (used by hosts that step their own engine).
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Request a forced switch to the default caption, as a pill leave-back does.
    ///
    /// Returns `None` when the caption subsystem is disabled.
    pub fn force_default_text(&mut self) -> Option<RequestOutcome> {
        let text = self.text.as_mut()?;
        let outcome = text.force_default(&mut self.text_state, &mut self.backend);
        self.drain_signals();
        match outcome {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                tracing::error!(%err, "forced default request failed");
                None
            }
        }
    }

    /// Handle one host callback. Errors are logged and never stop later events.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn dispatch(&mut self, event: StageEvent) {
        match event {
            StageEvent::Scroll { region, event } => self.on_scroll(region, event),
            StageEvent::Tween(ev) => self.on_tween(ev),
            StageEvent::Timer(ev) => self.on_timer(ev),
            StageEvent::Resize => {
                if let Some(spacer) = self.spacer.as_mut() {
                    spacer.on_resize(&mut self.backend);
                }
            }
        }
        self.drain_signals();
    }

    fn on_scroll(&mut self, region: RegionId, event: ScrollEvent) {
        match (region, event) {
            (RegionId::Pill, ScrollEvent::Enter) => {
                if let Some(pill) = self.pill.as_mut() {
                    report(
                        "pill",
                        pill.on_region_enter(&mut self.pill_state, &mut self.backend),
                    );
                }
            }
            (RegionId::Pill, ScrollEvent::EnterBack) => {
                if let Some(pill) = self.pill.as_mut() {
                    report(
                        "pill",
                        pill.on_region_enter_back(
                            &mut self.pill_state,
                            &mut self.backend,
                            &mut self.bus,
                        ),
                    );
                }
            }
            (RegionId::Pill, ScrollEvent::LeaveBack) => {
                if let Some(pill) = self.pill.as_mut() {
                    report(
                        "pill",
                        pill.on_region_leave_back(
                            &mut self.pill_state,
                            &mut self.backend,
                            &mut self.bus,
                        ),
                    );
                }
            }
            (RegionId::Scale, ScrollEvent::Progress(p)) => {
                if let Some(spacer) = self.spacer.as_ref() {
                    report("spacer", spacer.apply(&mut self.backend));
                }
                // Without a pill there is no phase to hold the captions on Default.
                let phase = match self.pill {
                    Some(_) => self.pill_state.phase,
                    None => PillPhase::Expanded,
                };
                if let Some(text) = self.text.as_mut() {
                    report(
                        "text",
                        text.on_scroll_progress(
                            &mut self.text_state,
                            phase,
                            p,
                            &mut self.backend,
                        ),
                    );
                }
                if let Some(mockup) = self.mockup.as_mut() {
                    mockup.on_progress(p, &mut self.backend);
                }
            }
            (RegionId::Handoff, ScrollEvent::Progress(p)) => {
                if let Some(handoff) = self.handoff.as_mut() {
                    report(
                        "handoff",
                        handoff.on_progress(&mut self.pill_state, p, &mut self.backend),
                    );
                }
            }
            (RegionId::Handoff, ScrollEvent::LeaveBack) => {
                if let Some(handoff) = self.handoff.as_mut() {
                    handoff.on_leave_back(&mut self.pill_state);
                }
            }
            (region, event) => {
                tracing::trace!(?region, ?event, "scroll callback not consumed");
            }
        }
    }

    fn on_tween(&mut self, ev: TweenEvent) {
        match ev.cue {
            Cue::RiseLifted | Cue::ExpandStart | Cue::RiseComplete | Cue::DisappearComplete => {
                if let Some(pill) = self.pill.as_mut() {
                    report(
                        "pill",
                        pill.on_tween(&mut self.pill_state, ev, &mut self.backend),
                    );
                }
            }
            Cue::TextFadeOut | Cue::TextFadeIn | Cue::CaptionFadeOut | Cue::CaptionFadeIn => {
                if let Some(text) = self.text.as_mut() {
                    report(
                        "text",
                        text.on_tween(&mut self.text_state, ev, &mut self.backend),
                    );
                }
            }
            Cue::MockupHeightStep | Cue::MockupHeightDone => {
                if let Some(mockup) = self.mockup.as_mut() {
                    report(
                        "mockup",
                        mockup.on_tween(ev, &mut self.backend, &mut self.bus),
                    );
                }
            }
            cue => tracing::debug!(?cue, "tween cue without owner"),
        }
    }

    fn on_timer(&mut self, ev: TimerEvent) {
        match ev.cue {
            Cue::ForceDefaultRetry => {
                if let Some(pill) = self.pill.as_mut() {
                    pill.on_timer(ev, &mut self.bus);
                }
            }
            Cue::ForceDefaultRelease => {
                if let Some(text) = self.text.as_mut() {
                    text.on_timer(&mut self.text_state, ev);
                }
            }
            Cue::MockupHeightStart => {
                if let Some(mockup) = self.mockup.as_mut() {
                    mockup.on_timer(ev, &mut self.backend);
                }
            }
            Cue::ResizeSettled => {
                if let Some(spacer) = self.spacer.as_mut() {
                    report("spacer", spacer.on_timer(ev, &mut self.backend));
                }
            }
            cue => tracing::debug!(?cue, "timer cue without owner"),
        }
    }

    fn drain_signals(&mut self) {
        while !self.bus.is_empty() {
            for signal in self.bus.drain() {
                self.on_signal(signal);
            }
        }
    }

    fn on_signal(&mut self, signal: Signal) {
        match signal {
            Signal::ForceDefaultText => {
                if let Some(text) = self.text.as_mut() {
                    match text.force_default(&mut self.text_state, &mut self.backend) {
                        Ok(outcome) => tracing::debug!(?outcome, "forced default requested"),
                        Err(err) => report::<()>("text", Err(err)),
                    }
                }
            }
            Signal::ReleaseForcedDefault => {
                if let Some(text) = self.text.as_mut() {
                    text.release_force(&mut self.text_state, &mut self.backend);
                }
            }
            Signal::SpacerRecompute => {
                if let Some(spacer) = self.spacer.as_ref() {
                    report("spacer", spacer.apply(&mut self.backend));
                }
            }
            Signal::SpacerFollow(px) => {
                if let Some(spacer) = self.spacer.as_ref() {
                    report("spacer", spacer.follow(&mut self.backend, px));
                }
            }
        }
    }
}

fn enabled<T>(subsystem: &str, res: StageResult<T>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(subsystem, %err, "subsystem disabled");
            None
        }
    }
}

fn report<T>(subsystem: &str, res: StageResult<T>) {
    if let Err(err) = res {
        tracing::error!(subsystem, %err, "handler failed, continuing");
    }
}
