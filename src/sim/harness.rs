use crate::config::StageConfig;
use crate::foundation::core::RegionId;
use crate::foundation::error::StageResult;
use crate::scroll::region::ScrollEvent;
use crate::sim::backend::SimBackend;
use crate::stage::coordinator::{Stage, StageEvent};

/// A [`Stage`] running on a [`SimBackend`].
#[derive(Debug)]
pub struct Harness {
    stage: Stage<SimBackend>,
}

impl Harness {
    /// Simulated frame length.
    pub const FRAME_SECS: f64 = 1.0 / 60.0;

    /// Bootstrap a stage on `backend`.
    pub fn new(cfg: StageConfig, backend: SimBackend) -> StageResult<Self> {
        Ok(Self {
            stage: Stage::bootstrap(cfg, backend)?,
        })
    }

    /// The stage.
    pub fn stage(&self) -> &Stage<SimBackend> {
        &self.stage
    }

    /// The stage, mutably.
    pub fn stage_mut(&mut self) -> &mut Stage<SimBackend> {
        &mut self.stage
    }

    /// The simulated page.
    pub fn backend(&self) -> &SimBackend {
        self.stage.backend()
    }

    /// The simulated page, mutably.
    pub fn backend_mut(&mut self) -> &mut SimBackend {
        self.stage.backend_mut()
    }

    /// Deliver a scroll callback.
    pub fn scroll(&mut self, region: RegionId, event: ScrollEvent) {
        self.stage.dispatch(StageEvent::Scroll { region, event });
    }

    /// Deliver a progress sample.
    pub fn progress(&mut self, region: RegionId, progress: f64) {
        self.scroll(region, ScrollEvent::Progress(progress));
    }

    /// Resize the viewport and report it.
    pub fn resize(&mut self, width: f64) {
        self.backend_mut().set_viewport_width(width);
        self.stage.dispatch(StageEvent::Resize);
    }

    /// Run whole frames covering `secs`, dispatching every callback as it is produced.
    pub fn advance(&mut self, secs: f64) {
        let frames = (secs / Self::FRAME_SECS - 1e-6).ceil().max(0.0) as usize;
        for _ in 0..frames {
            self.frame();
        }
    }

    /// Run a single frame.
    pub fn frame(&mut self) {
        self.backend_mut().step(Self::FRAME_SECS);
        while let Some(ev) = self.backend_mut().next_event() {
            self.stage.dispatch(ev);
        }
    }
}
