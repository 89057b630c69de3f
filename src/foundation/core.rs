/// Logical role of a render-tree element the stage drives.
///
/// Roles are resolved to [`ElementRef`]s once, at bootstrap.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum ElementRole {
    /// Wrapper of the floating pill; all pill tweens target it.
    PillWrapper,
    /// Static default caption.
    DefaultCaption,
    /// Direction-dependent caption.
    DynamicCaption,
    /// Scalable device mockup (also the trigger of the handoff sub-region).
    Mockup,
    /// Device image section whose height shrinks after the scale effect.
    DeviceSection,
    /// Main animation section (trigger of the pill region).
    MainSection,
    /// Layout spacer inserted around the pinned device section.
    Spacer,
}

/// Opaque handle to a resolved render-tree element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementRef(pub u32);

/// Scroll direction derived from two consecutive progress samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Progress increased.
    Forward,
    /// Progress decreased or stalled.
    Backward,
}

/// A progress pair for one scroll frame.
///
/// Direction is always derived from the pair and never stored on its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollProgress {
    /// Progress reported for this frame, clamped to `[0, 1]`.
    pub current: f64,
    /// Progress reported for the previous frame, clamped to `[0, 1]`.
    pub previous: f64,
}

impl ScrollProgress {
    /// Build a progress pair, clamping both values (NaN maps to 0).
    pub fn new(current: f64, previous: f64) -> Self {
        Self {
            current: clamp_progress(current),
            previous: clamp_progress(previous),
        }
    }

    /// `Forward` iff `current > previous`; a stall counts as `Backward`.
    pub fn direction(self) -> Direction {
        if self.current > self.previous {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

/// Clamp a progress value into `[0, 1]`, mapping NaN to 0.
pub fn clamp_progress(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Identifier of a registered scroll region.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum RegionId {
    /// Main section range that shows and hides the pill.
    Pill,
    /// Pinned device section range driving the mockup scale and the captions.
    Scale,
    /// Mockup sub-range driving the transform handoff.
    Handoff,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
