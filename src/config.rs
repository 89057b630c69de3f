use crate::animation::ease::Ease;
use crate::foundation::error::{StageError, StageResult};

/// Complete stage configuration.
///
/// Every section falls back to page defaults, so `{}` is a valid configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Pill rise/disappear timings and positions.
    pub pill: PillConfig,
    /// Caption timings, thresholds and texts.
    pub text: TextConfig,
    /// Transform handoff curve.
    pub handoff: HandoffConfig,
    /// Device mockup scale and height effect.
    pub mockup: MockupConfig,
    /// Responsive spacer sizing.
    pub spacer: SpacerConfig,
}

impl StageConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> StageResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges.
    pub fn validate(&self) -> StageResult<()> {
        let durations = [
            ("pill.rise_secs", self.pill.rise_secs),
            ("pill.expand_secs", self.pill.expand_secs),
            ("pill.descent_secs", self.pill.descent_secs),
            ("pill.contract_secs", self.pill.contract_secs),
            ("pill.descent_offset_secs", self.pill.descent_offset_secs),
            ("pill.force_retry_secs", self.pill.force_retry_secs),
            ("text.default_fade_out_secs", self.text.default_fade_out_secs),
            ("text.dynamic_fade_out_secs", self.text.dynamic_fade_out_secs),
            ("text.fade_in_secs", self.text.fade_in_secs),
            ("text.force_release_secs", self.text.force_release_secs),
            ("mockup.height_delay_secs", self.mockup.height_delay_secs),
            ("mockup.height_secs", self.mockup.height_secs),
            ("spacer.resize_debounce_secs", self.spacer.resize_debounce_secs),
        ];
        for (name, v) in durations {
            if !v.is_finite() || v < 0.0 {
                return Err(StageError::config(format!(
                    "{name} must be a finite non-negative duration, got {v}"
                )));
            }
        }

        let t = &self.text;
        if !(0.0..=1.0).contains(&t.band_start)
            || !(0.0..=1.0).contains(&t.band_end)
            || t.band_start >= t.band_end
        {
            return Err(StageError::config(
                "text caption band must satisfy 0 <= band_start < band_end <= 1",
            ));
        }
        if !(0.0..1.0).contains(&t.mode_threshold) {
            return Err(StageError::config("text.mode_threshold must be in [0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.handoff.complete_at) {
            return Err(StageError::config("handoff.complete_at must be in [0, 1]"));
        }
        if self.mockup.min_scale <= 0.0 {
            return Err(StageError::config("mockup.min_scale must be positive"));
        }
        if self.spacer.mobile_min_width >= self.spacer.mobile_max_width {
            return Err(StageError::config(
                "spacer.mobile_min_width must be below spacer.mobile_max_width",
            ));
        }
        Ok(())
    }
}

/// Pill timings (seconds) and positions (px).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PillConfig {
    /// Off-screen start offset.
    pub initial_y: f64,
    /// Resting offset after the rise.
    pub final_y: f64,
    /// Offset the disappear descent ends at.
    pub disappear_y: f64,
    /// Leave-back plays the disappear animation only when `y <= disappear_threshold_y`.
    pub disappear_threshold_y: f64,
    /// Y sub-tween duration of the rise.
    pub rise_secs: f64,
    /// Width sub-tween duration of the rise.
    pub expand_secs: f64,
    /// Y descent duration of the disappear.
    pub descent_secs: f64,
    /// Width contraction duration of the disappear.
    pub contract_secs: f64,
    /// Offset at which the descent starts inside the disappear timeline.
    pub descent_offset_secs: f64,
    /// Opacity at the start of the rise.
    pub start_opacity: f64,
    /// Opacity at the end of the rise.
    pub risen_opacity: f64,
    /// Opacity at the end of the disappear.
    pub disappear_opacity: f64,
    /// Easing of the rise.
    pub rise_ease: Ease,
    /// Easing of the width expansion.
    pub expand_ease: Ease,
    /// Easing of the disappear.
    pub disappear_ease: Ease,
    /// Class carrying the expanded styling.
    pub expanded_class: String,
    /// Delay before the forced default-text request is re-issued.
    pub force_retry_secs: f64,
}

impl Default for PillConfig {
    fn default() -> Self {
        Self {
            initial_y: 800.0,
            final_y: -120.0,
            disappear_y: 800.0,
            disappear_threshold_y: -100.0,
            rise_secs: 0.9,
            expand_secs: 1.1,
            descent_secs: 0.8,
            contract_secs: 0.4,
            descent_offset_secs: 0.2,
            start_opacity: 0.9,
            risen_opacity: 1.0,
            disappear_opacity: 0.7,
            rise_ease: Ease::OutQuad,
            expand_ease: Ease::OutQuad,
            disappear_ease: Ease::InQuad,
            expanded_class: "expanded".to_owned(),
            force_retry_secs: 0.1,
        }
    }
}

/// Caption timings, thresholds and texts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Default mode switches to Dynamic once progress exceeds this value.
    pub mode_threshold: f64,
    /// Dynamic caption shows only while `band_start < progress < band_end`.
    pub band_start: f64,
    /// See `band_start`.
    pub band_end: f64,
    /// Fade-out of the default caption.
    pub default_fade_out_secs: f64,
    /// Fade-out of the dynamic caption.
    pub dynamic_fade_out_secs: f64,
    /// Fade-in of either caption.
    pub fade_in_secs: f64,
    /// Easing of every caption fade.
    pub ease: Ease,
    /// Window after which a forced default override expires on its own.
    pub force_release_secs: f64,
    /// Rendered opacity above which a caption counts as visible.
    pub visible_opacity: f64,
    /// Caption shown while scrolling forward.
    pub forward_caption: String,
    /// Caption shown while scrolling backward.
    pub backward_caption: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            mode_threshold: 0.0,
            band_start: 0.1,
            band_end: 0.9,
            default_fade_out_secs: 0.25,
            dynamic_fade_out_secs: 0.2,
            fade_in_secs: 0.3,
            ease: Ease::OutQuad,
            force_release_secs: 2.0,
            visible_opacity: 0.5,
            forward_caption: "The mockup shrinks with a CSS scale".to_owned(),
            backward_caption: "Back to its original size".to_owned(),
        }
    }
}

/// Transform handoff curve.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    /// Offset at sub-region progress 0; must equal the pill's resting offset.
    pub start_offset: f64,
    /// Opacity at sub-region progress 0.
    pub start_opacity: f64,
    /// Progress at which manual styles are dropped.
    pub complete_at: f64,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            start_offset: -120.0,
            start_opacity: 0.95,
            complete_at: 0.99,
        }
    }
}

/// Device mockup scale and height effect.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MockupConfig {
    /// Scale at scale-region progress 1.
    pub min_scale: f64,
    /// Easing from progress to scale.
    pub scale_ease: Ease,
    /// Delay between scale completion and the height reduction.
    pub height_delay_secs: f64,
    /// Height reduction duration.
    pub height_secs: f64,
    /// Section height before the reduction.
    pub height_from_vh: f64,
    /// Section height after the reduction.
    pub height_to_vh: f64,
    /// Easing of the height reduction.
    pub height_ease: Ease,
}

impl Default for MockupConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.6667,
            scale_ease: Ease::OutQuad,
            height_delay_secs: 0.5,
            height_secs: 2.0,
            height_from_vh: 100.0,
            height_to_vh: 60.0,
            height_ease: Ease::InOutQuad,
        }
    }
}

/// Responsive spacer sizing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpacerConfig {
    /// Smallest width (inclusive) treated as mobile.
    pub mobile_min_width: f64,
    /// Largest width (exclusive) treated as mobile.
    pub mobile_max_width: f64,
    /// Spacer height on mobile.
    pub mobile_height_vh: f64,
    /// Spacer height elsewhere.
    pub desktop_height_vh: f64,
    /// Quiet period after the last resize before recomputing.
    pub resize_debounce_secs: f64,
}

impl Default for SpacerConfig {
    fn default() -> Self {
        Self {
            mobile_min_width: 360.0,
            mobile_max_width: 768.0,
            mobile_height_vh: 90.0,
            desktop_height_vh: 125.0,
            resize_debounce_secs: 0.1,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
