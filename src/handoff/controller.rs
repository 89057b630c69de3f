use crate::animation::ease::Ease;
use crate::config::HandoffConfig;
use crate::foundation::core::{ElementRef, ElementRole, RegionId, clamp_progress};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::math::lerp;
use crate::pill::state::PillAnimationState;
use crate::render::boundary::{Priority, StyleValue};
use crate::scroll::region::{Boundary, RegionSpec};
use crate::stage::backend::Backend;

const TRANSFORM: &str = "transform";
const OPACITY: &str = "opacity";

/// Manual style values for one sub-region progress sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandoffFrame {
    /// Clamped sub-region progress.
    pub progress: f64,
    /// `sin(progress * pi / 2)`.
    pub eased: f64,
    /// Vertical offset in px.
    pub y: f64,
    /// Pill opacity.
    pub opacity: f64,
}

/// Manual style values for `progress` on the handoff curve.
///
/// The curve is `sin(p * pi / 2)`, interpolating the offset from `start_offset` to 0 and the
/// opacity from `start_opacity` to 1.
pub fn handoff_frame(cfg: &HandoffConfig, progress: f64) -> HandoffFrame {
    let progress = clamp_progress(progress);
    let eased = Ease::OutSine.apply(progress);
    HandoffFrame {
        progress,
        eased,
        y: lerp(cfg.start_offset, 0.0, eased),
        opacity: lerp(cfg.start_opacity, 1.0, eased),
    }
}

/// Tracks the handoff sub-region and moves pill positioning from per-frame inline styles
/// to the persistent stylesheet rule once the sub-region is (nearly) complete.
///
/// At progress 1 the curve lands on offset 0 and opacity 1, the resting values of the
/// persistent rule, so dropping the inline styles causes no jump.
#[derive(Debug)]
pub struct TransformHandoffController {
    cfg: HandoffConfig,
    pill: ElementRef,
}

impl TransformHandoffController {
    /// Resolve the pill and register the handoff sub-region.
    pub fn new(cfg: HandoffConfig, backend: &mut dyn Backend) -> StageResult<Self> {
        let pill = backend
            .resolve(ElementRole::PillWrapper)
            .ok_or(StageError::MissingTarget(ElementRole::PillWrapper))?;
        backend.register(RegionSpec {
            id: RegionId::Handoff,
            trigger: ElementRole::Mockup,
            start: Boundary::Edge {
                element: 0.65,
                viewport: 0.0,
            },
            end: Boundary::Edge {
                element: 0.9,
                viewport: 0.0,
            },
            scrub_secs: Some(2.0),
            pin: false,
        });
        Ok(Self { cfg, pill })
    }

    /// Write the manual styles for this frame, or perform the one-shot handoff.
    pub fn on_progress(
        &mut self,
        state: &mut PillAnimationState,
        progress: f64,
        backend: &mut dyn Backend,
    ) -> StageResult<()> {
        if state.transform_handoff_done {
            return Ok(());
        }
        let frame = handoff_frame(&self.cfg, progress);
        backend.set_style(
            self.pill,
            TRANSFORM,
            StyleValue::TranslateY(frame.y),
            Priority::Normal,
        )?;
        backend.set_style(
            self.pill,
            OPACITY,
            StyleValue::Number(frame.opacity),
            Priority::Normal,
        )?;
        tracing::trace!(y = frame.y, progress = frame.progress, "handoff frame");

        if frame.progress >= self.cfg.complete_at {
            backend.clear_style(self.pill, TRANSFORM)?;
            backend.clear_style(self.pill, OPACITY)?;
            state.transform_handoff_done = true;
            tracing::debug!("transform handed off to persistent positioning");
        }
        Ok(())
    }

    /// Sub-region start crossed backward: manual control resumes on the next forward pass.
    pub fn on_leave_back(&mut self, state: &mut PillAnimationState) {
        state.transform_handoff_done = false;
        tracing::debug!("handoff reset");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/handoff/controller.rs"]
mod tests;
