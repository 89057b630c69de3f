/// Easing functions used to map normalized tween progress.
///
/// Variants also deserialize from the GSAP names used in page configuration
/// (`"power2.out"`, `"sine.out"`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    #[serde(alias = "none", alias = "linear")]
    Linear,
    /// Quadratic ease-in.
    #[serde(alias = "power2.in")]
    InQuad,
    /// Quadratic ease-out.
    #[serde(alias = "power2.out", alias = "power2")]
    OutQuad,
    /// Quadratic ease-in/out.
    #[serde(alias = "power2.inOut")]
    InOutQuad,
    /// Cubic ease-in.
    #[serde(alias = "power3.in")]
    InCubic,
    /// Cubic ease-out.
    #[serde(alias = "power3.out")]
    OutCubic,
    /// Cubic ease-in/out.
    #[serde(alias = "power3.inOut")]
    InOutCubic,
    /// Quarter-sine ease-out, `sin(t * pi / 2)`.
    #[serde(alias = "sine.out")]
    OutSine,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutSine => (t * std::f64::consts::FRAC_PI_2).sin(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
