//! Shared types for the contam request/response pipeline.

use serde::{Deserialize, Serialize};

/// Number of bytes per pixel in a [`Picture`] buffer (RGBA8).
pub const CHANNELS: usize = 4;

/// An RGBA8 image produced by the backend.
///
/// Pictures are immutable once built: the presentation layer replaces
/// them wholesale and never edits pixels in place.
///
/// Uses custom `Serialize`/`Deserialize` implementations so that a
/// picture crosses the backend boundary as a `(width, height, data)`
/// triple, and so that deserialization re-checks the buffer length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Picture {
    /// Build a picture from raw RGBA8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PictureError::ZeroDimension`] if either dimension is
    /// zero, and [`PictureError::LengthMismatch`] if `data` is not
    /// exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PictureError> {
        if width == 0 || height == 0 {
            return Err(PictureError::ZeroDimension { width, height });
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(PictureError::TooLarge { width, height })?;
        if data.len() != expected {
            return Err(PictureError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl Serialize for Picture {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.width, self.height, &self.data).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Picture {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (width, height, data) = <(u32, u32, Vec<u8>)>::deserialize(deserializer)?;
        Self::new(width, height, data).map_err(serde::de::Error::custom)
    }
}

/// Errors from building a [`Picture`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PictureError {
    /// One of the dimensions is zero.
    #[error("picture has a zero dimension ({width}x{height})")]
    ZeroDimension { width: u32, height: u32 },

    /// `width * height * 4` does not fit in memory.
    #[error("picture is too large ({width}x{height})")]
    TooLarge { width: u32, height: u32 },

    /// The pixel buffer does not match the dimensions.
    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// A parameter could not be turned into a valid request.
///
/// These arise only where a selection arrives by name (command-line
/// flags, JSON presets). Typed callers cannot produce them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The style name is not one of the known blend styles.
    #[error("unknown style {0:?} (expected always, lightest, darkest, or mix)")]
    UnknownStyle(String),

    /// The gradient name is not one of the known gradient shapes.
    #[error("unknown gradient {0:?} (expected none, horizontal, vertical, or radial)")]
    UnknownGradient(String),

    /// A center point could not be parsed.
    #[error("invalid center {0:?} (expected X,Y with both in 0..=1)")]
    InvalidCenter(String),

    /// A parameter preset could not be parsed.
    #[error("invalid parameter preset: {0}")]
    InvalidPreset(String),
}

/// The backend rejected a call.
///
/// Carries the backend's diagnostic text verbatim; `Display` prints the
/// message with no prefix so it can be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct BackendFailure {
    message: String,
}

impl BackendFailure {
    /// Wrap a diagnostic message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consumes the failure and returns the message.
    #[must_use]
    pub fn into_message(self) -> String {
        self.message
    }
}
