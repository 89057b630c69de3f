/// Discrete animation phase of the pill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PillPhase {
    /// Off-screen, display suppressed.
    #[default]
    Hidden,
    /// Y sub-tween of the rise running.
    Rising,
    /// Y sub-tween done, width expansion running.
    Expanding,
    /// Rise finished; the pill rests at its final offset.
    Expanded,
    /// Disappear timeline running.
    Disappearing,
}

impl PillPhase {
    /// Phases during which captions are held on Default.
    pub fn holds_default_text(self) -> bool {
        matches!(self, Self::Hidden | Self::Disappearing)
    }
}

/// Pill animation state, owned by the stage for the page session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PillAnimationState {
    /// Current phase.
    pub phase: PillPhase,
    /// A rise or disappear timeline is in flight.
    pub is_animating: bool,
    /// The in-flight timeline is the disappear.
    pub is_reverse: bool,
    /// Y-position authority has moved from per-frame styles to the persistent rule.
    pub transform_handoff_done: bool,
}

impl PillAnimationState {
    /// A rise timeline is in flight.
    pub fn is_rising(&self) -> bool {
        self.is_animating && !self.is_reverse
    }
}
