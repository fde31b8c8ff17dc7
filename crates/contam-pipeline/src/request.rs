//! Request building for the three backend operations.
//!
//! [`RequestBuilder`] borrows the [`ParameterModel`] and reads it at
//! build time. Numeric fields are clamped here, regardless of what the
//! control widgets already enforce, so that nothing out of range ever
//! reaches the backend.

use serde::{Deserialize, Serialize};

use crate::gradient::{GradientSpec, encode};
use crate::params::{ParameterModel, Style};

/// The normalized parameter set shared by every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodedParams {
    /// Displacement strength, clamped and stepped.
    pub scale: f64,
    /// Displacement offset, clamped and stepped.
    pub bias: f64,
    /// Blend policy.
    pub style: Style,
    /// Encoded gradient shape.
    pub gradient_spec: GradientSpec,
    /// Invert the gradient's polarity.
    pub reverse: bool,
}

/// Load a source image and return its preview (`get_image`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRequest {
    /// Path picked in the open dialog. Never empty.
    pub path: String,
    #[serde(flatten)]
    pub params: EncodedParams,
}

/// Regenerate from the source the backend already holds (`gen_image`).
///
/// Carries no pixel data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegenRequest {
    #[serde(flatten)]
    pub params: EncodedParams,
}

/// Re-render with the current parameters and write to disk
/// (`save_image`).
///
/// The backend runs the transform again rather than reusing the last
/// preview, so the saved file always matches these parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Path picked in the save dialog. Never empty.
    pub path: String,
    #[serde(flatten)]
    pub params: EncodedParams,
}

/// Any request that can cross the backend boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Request {
    #[serde(rename = "get_image")]
    Load(LoadRequest),
    #[serde(rename = "gen_image")]
    Regenerate(RegenRequest),
    #[serde(rename = "save_image")]
    Save(SaveRequest),
}

impl Request {
    /// Backend command name for this request.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        match self {
            Self::Load(_) => "get_image",
            Self::Regenerate(_) => "gen_image",
            Self::Save(_) => "save_image",
        }
    }
}

/// Assembles requests from the current parameter values.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    params: &'a ParameterModel,
}

impl<'a> RequestBuilder<'a> {
    /// Build requests over `params`.
    #[must_use]
    pub const fn new(params: &'a ParameterModel) -> Self {
        Self { params }
    }

    /// Clamp and encode the current parameters.
    #[must_use]
    pub fn encoded(&self) -> EncodedParams {
        let p = self.params;
        EncodedParams {
            scale: p.clamped_scale(),
            bias: p.clamped_bias(),
            style: p.style,
            gradient_spec: encode(p.gradient, p.center.clamped()),
            reverse: p.reverse,
        }
    }

    /// Build a load request, or `None` when `path` is empty (the open
    /// dialog was cancelled).
    #[must_use]
    pub fn build_load(&self, path: &str) -> Option<LoadRequest> {
        selected(path).map(|path| LoadRequest {
            path,
            params: self.encoded(),
        })
    }

    /// Build a regenerate request.
    #[must_use]
    pub fn build_regenerate(&self) -> RegenRequest {
        RegenRequest {
            params: self.encoded(),
        }
    }

    /// Build a save request, or `None` when `path` is empty (the save
    /// dialog was cancelled).
    #[must_use]
    pub fn build_save(&self, path: &str) -> Option<SaveRequest> {
        selected(path).map(|path| SaveRequest {
            path,
            params: self.encoded(),
        })
    }
}

fn selected(path: &str) -> Option<String> {
    if path.trim().is_empty() {
        None
    } else {
        Some(path.to_owned())
    }
}
