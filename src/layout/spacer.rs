use crate::animation::timers::{TimerEvent, TimerHandle};
use crate::animation::tween::Cue;
use crate::config::SpacerConfig;
use crate::foundation::core::{ElementRef, ElementRole};
use crate::foundation::error::{StageError, StageResult};
use crate::render::boundary::{Priority, StyleValue};
use crate::stage::backend::Backend;

/// Spacer height in vh for a viewport width.
pub fn spacer_height_vh(cfg: &SpacerConfig, viewport_width: f64) -> f64 {
    let mobile = viewport_width >= cfg.mobile_min_width && viewport_width < cfg.mobile_max_width;
    if mobile {
        cfg.mobile_height_vh
    } else {
        cfg.desktop_height_vh
    }
}

/// Keeps the pin spacer sized for the current viewport.
#[derive(Debug)]
pub struct ResponsiveSpacerSizer {
    cfg: SpacerConfig,
    spacer: ElementRef,
    pending: Option<TimerHandle>,
}

impl ResponsiveSpacerSizer {
    /// Resolve the spacer element.
    pub fn new(cfg: SpacerConfig, backend: &mut dyn Backend) -> StageResult<Self> {
        let spacer = backend
            .resolve(ElementRole::Spacer)
            .ok_or(StageError::MissingTarget(ElementRole::Spacer))?;
        Ok(Self {
            cfg,
            spacer,
            pending: None,
        })
    }

    /// Recompute from the viewport width and pin `height`, `min-height` and `max-height`.
    pub fn apply(&self, backend: &mut dyn Backend) -> StageResult<()> {
        let vh = spacer_height_vh(&self.cfg, backend.viewport_width());
        let value = StyleValue::Vh(vh);
        backend.set_style(self.spacer, "height", value, Priority::Important)?;
        backend.set_style(self.spacer, "min-height", value, Priority::Normal)?;
        backend.set_style(self.spacer, "max-height", value, Priority::Normal)?;
        tracing::trace!(vh, "spacer height applied");
        Ok(())
    }

    /// Follow a section height that is being animated, in px.
    pub fn follow(&self, backend: &mut dyn Backend, height_px: f64) -> StageResult<()> {
        backend.set_style(
            self.spacer,
            "height",
            StyleValue::Px(height_px),
            Priority::Important,
        )?;
        backend.set_style(self.spacer, "min-height", StyleValue::Auto, Priority::Normal)?;
        backend.set_style(self.spacer, "max-height", StyleValue::None, Priority::Normal)?;
        Ok(())
    }

    /// Viewport resized: restart the debounce window.
    pub fn on_resize(&mut self, backend: &mut dyn Backend) {
        if let Some(h) = self.pending.take() {
            backend.cancel_timer(h);
        }
        self.pending = Some(backend.schedule(self.cfg.resize_debounce_secs, Cue::ResizeSettled));
    }

    /// Route a timer cue.
    pub fn on_timer(&mut self, ev: TimerEvent, backend: &mut dyn Backend) -> StageResult<()> {
        if ev.cue != Cue::ResizeSettled || self.pending != Some(ev.handle) {
            return Ok(());
        }
        self.pending = None;
        self.apply(backend)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/spacer.rs"]
mod tests;
