use crate::foundation::core::Direction;

/// Which caption is authoritative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TextMode {
    /// Static default caption.
    #[default]
    Default,
    /// Direction-dependent caption.
    Dynamic,
}

/// Caption arbitration state, owned by the stage for the page session.
///
/// Outside a transition exactly one of `default_visible` and `dynamic_visible` is true and
/// it matches `mode`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextModeState {
    /// Authoritative caption.
    pub mode: TextMode,
    /// Default caption slot is visible.
    pub default_visible: bool,
    /// Dynamic caption slot is visible.
    pub dynamic_visible: bool,
    /// Caption text currently shown inside the dynamic slot.
    pub dynamic_caption: Option<Direction>,
    /// Direction of the last caption shown.
    pub last_direction: Option<Direction>,
    /// A caption transition is running.
    pub transition_in_flight: bool,
    /// Scroll-driven mode changes are suspended.
    pub force_default_active: bool,
}

impl Default for TextModeState {
    fn default() -> Self {
        Self {
            mode: TextMode::Default,
            default_visible: true,
            dynamic_visible: false,
            dynamic_caption: None,
            last_direction: None,
            transition_in_flight: false,
            force_default_active: false,
        }
    }
}

impl TextModeState {
    /// Exactly one slot is visible and it matches `mode`.
    pub fn is_exclusive(&self) -> bool {
        match self.mode {
            TextMode::Default => self.default_visible && !self.dynamic_visible,
            TextMode::Dynamic => self.dynamic_visible && !self.default_visible,
        }
    }

    pub(crate) fn show_only(&mut self, mode: TextMode) {
        self.mode = mode;
        self.default_visible = mode == TextMode::Default;
        self.dynamic_visible = mode == TextMode::Dynamic;
    }
}
