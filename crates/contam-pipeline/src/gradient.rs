//! Gradient encoding: turn the panel's gradient selection into the
//! tagged value sent across the backend boundary.
//!
//! Only the radial shape carries a payload, so [`GradientSpec`] makes
//! "radial implies a center" a property of the type rather than a
//! convention between optional fields.

use serde::{Deserialize, Serialize};

use crate::params::{Center, GradientKind};
use crate::types::ConfigError;

/// Wire-level gradient shape.
///
/// Serialized with serde's external tagging: unit variants become bare
/// strings (`"Horizontal"`) and the radial variant becomes
/// `{"Radial":{"x":..,"y":..}}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum GradientSpec {
    /// Uniform strength.
    #[default]
    None,
    /// Left-to-right ramp.
    Horizontal,
    /// Top-to-bottom ramp.
    Vertical,
    /// Distance from a center point given as fractions of width and
    /// height.
    Radial { x: f64, y: f64 },
}

impl GradientSpec {
    /// The selection this value was encoded from.
    #[must_use]
    pub const fn kind(self) -> GradientKind {
        match self {
            Self::None => GradientKind::None,
            Self::Horizontal => GradientKind::Horizontal,
            Self::Vertical => GradientKind::Vertical,
            Self::Radial { .. } => GradientKind::Radial,
        }
    }
}

/// Encode a gradient selection.
///
/// `center` is read only for [`GradientKind::Radial`], and is passed
/// through exactly; every other selection yields a payload-free tag.
#[must_use]
pub const fn encode(selection: GradientKind, center: Center) -> GradientSpec {
    match selection {
        GradientKind::None => GradientSpec::None,
        GradientKind::Horizontal => GradientSpec::Horizontal,
        GradientKind::Vertical => GradientSpec::Vertical,
        GradientKind::Radial => GradientSpec::Radial {
            x: center.x,
            y: center.y,
        },
    }
}

/// Encode a gradient selection given by name.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownGradient`] if `name` is not one of the
/// known shapes. Unknown names are never mapped to
/// [`GradientSpec::None`].
pub fn encode_named(name: &str, center: Center) -> Result<GradientSpec, ConfigError> {
    let selection: GradientKind = name.parse()?;
    Ok(encode(selection, center))
}
