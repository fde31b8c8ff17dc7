//! contam-pipeline: parameters, requests, and presentation state for
//! contam (sans-IO).
//!
//! Models the client side of image contamination:
//! control values -> normalized request -> backend call -> visual state.
//!
//! This crate has **no I/O and no pixel math**. The contamination itself
//! happens behind the [`Backend`] trait (see `contam-engine` for the
//! in-process implementation), and drawing happens behind the
//! [`Surface`] trait.

pub mod backend;
pub mod gradient;
pub mod outcome;
pub mod params;
pub mod presentation;
pub mod request;
pub mod session;
pub mod types;

pub use backend::{Backend, BackendClient, Reply};
pub use gradient::{GradientSpec, encode, encode_named};
pub use outcome::Outcome;
pub use params::{Center, GradientKind, ParameterModel, Style};
pub use presentation::{
    CanvasSize, Frame, PresentationConfig, PresentationController, Surface, Visibility,
    VisualState,
};
pub use request::{EncodedParams, LoadRequest, RegenRequest, Request, RequestBuilder, SaveRequest};
pub use session::{Completion, Session};
pub use types::{BackendFailure, CHANNELS, ConfigError, Picture, PictureError};
