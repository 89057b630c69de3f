use crate::foundation::core::{ElementRole, RegionId};

/// One end of a scroll region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Boundary {
    /// Fires when `element` (fraction of the trigger's height) meets `viewport` (fraction of
    /// the viewport height). `Edge { element: 0.65, viewport: 0.0 }` is `"65% top"`.
    Edge {
        /// Fraction of the trigger element, 0 = top.
        element: f64,
        /// Fraction of the viewport, 0 = top.
        viewport: f64,
    },
    /// A distance after the region start, in viewport-height units (`"+=400vh"`).
    AfterStartVh(f64),
}

impl Boundary {
    /// `"top top"`.
    pub const TOP_TOP: Self = Self::Edge {
        element: 0.0,
        viewport: 0.0,
    };

    /// `"bottom top"`.
    pub const BOTTOM_TOP: Self = Self::Edge {
        element: 1.0,
        viewport: 0.0,
    };
}

/// Registration request for a tracked scroll region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionSpec {
    /// Identifier echoed back in scroll events.
    pub id: RegionId,
    /// Element whose geometry defines the boundaries.
    pub trigger: ElementRole,
    /// Region start.
    pub start: Boundary,
    /// Region end.
    pub end: Boundary,
    /// Smoothing lag in seconds between scroll position and reported progress.
    pub scrub_secs: Option<f64>,
    /// Pin the trigger while the region is active.
    pub pin: bool,
}

/// Callback delivered by the scroll observer for a registered region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollEvent {
    /// Progress in `[0, 1]`, delivered at animation-frame cadence while active.
    Progress(f64),
    /// Start boundary crossed scrolling forward.
    Enter,
    /// End boundary crossed scrolling forward.
    Leave,
    /// End boundary crossed scrolling backward.
    EnterBack,
    /// Start boundary crossed scrolling backward.
    LeaveBack,
}

/// Black-box scroll observation service.
pub trait ScrollObserver {
    /// Start tracking a region. Its callbacks reach the stage as
    /// [`crate::StageEvent::Scroll`].
    fn register(&mut self, spec: RegionSpec);
}
