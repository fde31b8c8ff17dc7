//! User-tunable contamination parameters.
//!
//! [`ParameterModel`] holds whatever the control panel last committed.
//! It is plain data: the control widgets are expected to keep values in
//! range, and [`RequestBuilder`](crate::RequestBuilder) clamps again
//! before anything crosses the backend boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::ConfigError;

/// How displaced pixels are combined with the source pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Style {
    /// Always take the displaced pixel.
    #[default]
    Always,
    /// Take the displaced pixel only when it is lighter.
    Lightest,
    /// Take the displaced pixel only when it is darker.
    Darkest,
    /// Average the displaced and source pixels.
    Mix,
}

impl Style {
    /// All styles in control-panel order.
    pub const ALL: [Self; 4] = [Self::Always, Self::Lightest, Self::Darkest, Self::Mix];

    /// Display label for the style.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Always => "Always",
            Self::Lightest => "Lightest",
            Self::Darkest => "Darkest",
            Self::Mix => "Mix",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Style {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownStyle(s.to_owned()))
    }
}

/// The gradient shape picked in the control panel.
///
/// This is the human-facing selection. The wire-level value is
/// [`GradientSpec`](crate::GradientSpec), produced by
/// [`encode`](crate::gradient::encode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GradientKind {
    /// Uniform strength across the image.
    #[default]
    None,
    /// Strength grows from left to right.
    Horizontal,
    /// Strength grows from top to bottom.
    Vertical,
    /// Strength grows with distance from [`ParameterModel::center`].
    Radial,
}

impl GradientKind {
    /// All gradient shapes in control-panel order.
    pub const ALL: [Self; 4] = [Self::None, Self::Horizontal, Self::Vertical, Self::Radial];

    /// Display label for the gradient shape.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Horizontal => "Horizontal",
            Self::Vertical => "Vertical",
            Self::Radial => "Radial",
        }
    }
}

impl fmt::Display for GradientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GradientKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownGradient(s.to_owned()))
    }
}

/// Radial gradient center as fractions of image width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    /// Horizontal position, 0.0 (left) to 1.0 (right).
    pub x: f64,
    /// Vertical position, 0.0 (top) to 1.0 (bottom).
    pub y: f64,
}

impl Center {
    /// The middle of the image.
    pub const MIDDLE: Self = Self { x: 0.5, y: 0.5 };

    /// Create a new center point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates clamped into `[0, 1]`; non-finite values fall
    /// back to the middle of the image on that axis.
    #[must_use]
    pub fn clamped(self) -> Self {
        let axis = |v: f64| {
            if v.is_finite() {
                v.clamp(0.0, 1.0)
            } else {
                0.5
            }
        };
        Self {
            x: axis(self.x),
            y: axis(self.y),
        }
    }
}

impl Default for Center {
    fn default() -> Self {
        Self::MIDDLE
    }
}

impl FromStr for Center {
    type Err = ConfigError;

    /// Parse `"X,Y"` where both values are fractions in `0..=1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidCenter(s.to_owned());
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x: f64 = x.trim().parse().map_err(|_| invalid())?;
        let y: f64 = y.trim().parse().map_err(|_| invalid())?;
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return Err(invalid());
        }
        Ok(Self { x, y })
    }
}

/// The current values of every contamination control.
///
/// Owned by exactly one writer (the [`Session`](crate::Session) owner)
/// and read on demand by [`RequestBuilder`](crate::RequestBuilder), so
/// a request always reflects the latest committed value.
///
/// `center` is kept when `gradient` changes away from
/// [`GradientKind::Radial`] so the last radial setting survives
/// toggling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterModel {
    /// Displacement strength.
    pub scale: f64,
    /// Constant offset added to every displacement.
    pub bias: f64,
    /// Blend policy between displaced and source pixels.
    pub style: Style,
    /// Spatial weighting shape.
    pub gradient: GradientKind,
    /// Radial gradient center. Only read when `gradient` is radial.
    pub center: Center,
    /// Invert the gradient's polarity.
    pub reverse: bool,
}

impl ParameterModel {
    /// Default displacement strength.
    pub const DEFAULT_SCALE: f64 = 40.0;
    /// Smallest accepted scale.
    pub const SCALE_MIN: f64 = 0.0;
    /// Largest accepted scale.
    pub const SCALE_MAX: f64 = 300.0;
    /// Scale slider step.
    pub const SCALE_STEP: f64 = 1.0;

    /// Default displacement offset.
    pub const DEFAULT_BIAS: f64 = 0.0;
    /// Smallest accepted bias.
    pub const BIAS_MIN: f64 = -100.0;
    /// Largest accepted bias.
    pub const BIAS_MAX: f64 = 100.0;
    /// Bias slider step.
    pub const BIAS_STEP: f64 = 1.0;

    /// `scale` clamped to its bounds and snapped to its step.
    #[must_use]
    pub fn clamped_scale(&self) -> f64 {
        quantize(
            self.scale,
            Self::SCALE_MIN,
            Self::SCALE_MAX,
            Self::SCALE_STEP,
            Self::DEFAULT_SCALE,
        )
    }

    /// `bias` clamped to its bounds and snapped to its step.
    #[must_use]
    pub fn clamped_bias(&self) -> f64 {
        quantize(
            self.bias,
            Self::BIAS_MIN,
            Self::BIAS_MAX,
            Self::BIAS_STEP,
            Self::DEFAULT_BIAS,
        )
    }
}

impl Default for ParameterModel {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
            bias: Self::DEFAULT_BIAS,
            style: Style::default(),
            gradient: GradientKind::default(),
            center: Center::default(),
            reverse: false,
        }
    }
}

/// Clamp to `[min, max]` and round to the nearest multiple of `step`.
/// Non-finite input yields `fallback`.
fn quantize(value: f64, min: f64, max: f64, step: f64, fallback: f64) -> f64 {
    if !value.is_finite() {
        return fallback;
    }
    let stepped = (value.clamp(min, max) / step).round() * step;
    stepped.clamp(min, max)
}
