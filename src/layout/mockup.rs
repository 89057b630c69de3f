use crate::animation::timers::{TimerEvent, TimerHandle};
use crate::animation::tween::{Cue, Prop, Props, TweenEvent, TweenHandle, TweenSpec};
use crate::config::MockupConfig;
use crate::foundation::core::{ElementRef, ElementRole, clamp_progress};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::math::lerp;
use crate::stage::backend::Backend;
use crate::stage::bus::{Signal, SignalBus};

/// Device mockup scale driven by the scale region, followed once by a section height
/// reduction.
#[derive(Debug)]
pub struct MockupScaler {
    cfg: MockupConfig,
    mockup: ElementRef,
    section: ElementRef,
    delay: Option<TimerHandle>,
    height: Option<TweenHandle>,
    reduced: bool,
}

impl MockupScaler {
    /// Resolve the mockup and its section.
    pub fn new(cfg: MockupConfig, backend: &mut dyn Backend) -> StageResult<Self> {
        let mockup = backend
            .resolve(ElementRole::Mockup)
            .ok_or(StageError::MissingTarget(ElementRole::Mockup))?;
        let section = backend
            .resolve(ElementRole::DeviceSection)
            .ok_or(StageError::MissingTarget(ElementRole::DeviceSection))?;
        Ok(Self {
            cfg,
            mockup,
            section,
            delay: None,
            height: None,
            reduced: false,
        })
    }

    /// Mockup scale at a scale-region progress.
    pub fn scale_at(&self, progress: f64) -> f64 {
        let eased = self.cfg.scale_ease.apply(clamp_progress(progress));
        lerp(1.0, self.cfg.min_scale, eased)
    }

    /// Whether the height reduction has been scheduled or run.
    pub fn height_reduced(&self) -> bool {
        self.reduced
    }

    /// Apply the scale; on first completion schedule the height reduction.
    pub fn on_progress(&mut self, progress: f64, backend: &mut dyn Backend) {
        let scale = self.scale_at(progress);
        backend.set(self.mockup, &Props::new().with(Prop::Scale, scale));

        if progress >= 1.0 && !self.reduced {
            self.reduced = true;
            self.delay = Some(backend.schedule(self.cfg.height_delay_secs, Cue::MockupHeightStart));
            tracing::debug!("mockup scale complete, height reduction scheduled");
        }
    }

    /// Route a timer cue.
    pub fn on_timer(&mut self, ev: TimerEvent, backend: &mut dyn Backend) {
        if ev.cue != Cue::MockupHeightStart || self.delay != Some(ev.handle) {
            return;
        }
        self.delay = None;
        let c = &self.cfg;
        let tween = TweenSpec::to(
            self.section,
            Props::new().with(Prop::HeightVh, c.height_to_vh),
            c.height_secs,
            c.height_ease,
        )
        .starting_at(Props::new().with(Prop::HeightVh, c.height_from_vh))
        .on_update(Cue::MockupHeightStep)
        .on_complete(Cue::MockupHeightDone);
        self.height = Some(backend.animate(tween));
    }

    /// Route a tween cue. Height steps ask the spacer to follow the measured section.
    pub fn on_tween(
        &mut self,
        ev: TweenEvent,
        backend: &mut dyn Backend,
        bus: &mut SignalBus,
    ) -> StageResult<()> {
        if self.height != Some(ev.handle) {
            return Ok(());
        }
        match ev.cue {
            Cue::MockupHeightStep => {
                let px = backend.bounding_height(self.section)?;
                bus.post(Signal::SpacerFollow(px));
            }
            Cue::MockupHeightDone => {
                self.height = None;
                bus.post(Signal::SpacerRecompute);
                tracing::debug!("section height reduction complete");
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/mockup.rs"]
mod tests;
