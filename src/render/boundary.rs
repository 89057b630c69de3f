use std::fmt;

use crate::foundation::core::{ElementRef, ElementRole};
use crate::foundation::error::StageResult;

/// A style value written through the render boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StyleValue {
    /// Unitless number (opacity, scale).
    Number(f64),
    /// Pixels.
    Px(f64),
    /// Viewport-height units.
    Vh(f64),
    /// `translateY(<px>)` transform.
    TranslateY(f64),
    /// `auto` keyword.
    Auto,
    /// `none` keyword.
    None,
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Px(v) => write!(f, "{v}px"),
            Self::Vh(v) => write!(f, "{v}vh"),
            Self::TranslateY(v) => write!(f, "translateY({v}px)"),
            Self::Auto => f.write_str("auto"),
            Self::None => f.write_str("none"),
        }
    }
}

/// Priority of an inline style write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Priority {
    /// Ordinary inline style.
    #[default]
    Normal,
    /// `!important` inline style.
    Important,
}

/// Style and tree access to the rendered page.
///
/// All element references are resolved once at bootstrap through [`RenderBoundary::resolve`].
pub trait RenderBoundary {
    /// Resolve a role to an element, `None` if the element does not exist.
    fn resolve(&self, role: ElementRole) -> Option<ElementRef>;

    /// Write an inline style property.
    fn set_style(
        &mut self,
        el: ElementRef,
        name: &str,
        value: StyleValue,
        priority: Priority,
    ) -> StageResult<()>;

    /// Remove an inline style property so stylesheet rules apply again.
    fn clear_style(&mut self, el: ElementRef, name: &str) -> StageResult<()>;

    /// Rendered height in px.
    fn bounding_height(&self, el: ElementRef) -> StageResult<f64>;

    /// Show (`display: flex`) or hide (`display: none`) an element.
    fn set_display(&mut self, el: ElementRef, visible: bool) -> StageResult<()>;

    /// Add or remove a class.
    fn toggle_class(&mut self, el: ElementRef, name: &str, on: bool) -> StageResult<()>;

    /// Computed opacity after styles and running tweens.
    fn computed_opacity(&self, el: ElementRef) -> StageResult<f64>;

    /// Replace the text content of an element.
    fn set_text(&mut self, el: ElementRef, text: &str) -> StageResult<()>;

    /// Current viewport width in px.
    fn viewport_width(&self) -> f64;
}
