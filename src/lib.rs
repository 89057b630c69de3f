//! scrollpill is the animation core of a scroll-linked product page.
//!
//! A floating "pill" rises into view when the main section enters the viewport and
//! disappears when the reader scrolls back above it. Inside a pinned device section the
//! mockup scales down while one of two captions (a static default and a direction-dependent
//! dynamic one) is shown. Near the end of that section the pill's per-frame inline
//! position is handed off to its persistent stylesheet rule.
//!
//! The public API is host-oriented:
//!
//! - Implement the collaborator traits ([`TweenEngine`], [`Timers`], [`RenderBoundary`],
//!   [`ScrollObserver`]) for your page host
//! - [`Stage::bootstrap`] the stage with a [`StageConfig`]
//! - Feed every host callback into [`Stage::dispatch`] as a [`StageEvent`]
//!
//! [`sim`] provides a deterministic in-memory host for tests and headless runs.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod config;
pub(crate) mod handoff;
pub(crate) mod layout;
pub(crate) mod pill;
pub(crate) mod render;
pub(crate) mod scroll;
pub mod sim;
pub(crate) mod stage;
pub(crate) mod text;

pub use crate::foundation::core::{
    Direction, ElementRef, ElementRole, RegionId, ScrollProgress, clamp_progress,
};
pub use crate::foundation::error::{StageError, StageResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::timers::{TimerEvent, TimerHandle, Timers};
pub use crate::animation::tween::{
    Cue, Prop, Props, TimelineSpec, TimelineStep, TweenEngine, TweenEvent, TweenHandle,
    TweenSpec,
};
pub use crate::config::{
    HandoffConfig, MockupConfig, PillConfig, SpacerConfig, StageConfig, TextConfig,
};
pub use crate::handoff::controller::{HandoffFrame, handoff_frame};
pub use crate::layout::spacer::spacer_height_vh;
pub use crate::pill::state::{PillAnimationState, PillPhase};
pub use crate::render::boundary::{Priority, RenderBoundary, StyleValue};
pub use crate::scroll::region::{Boundary, RegionSpec, ScrollEvent, ScrollObserver};
pub use crate::stage::backend::Backend;
pub use crate::stage::coordinator::{Stage, StageEvent, SubsystemStatus};
pub use crate::text::arbitrator::RequestOutcome;
pub use crate::text::state::{TextMode, TextModeState};
