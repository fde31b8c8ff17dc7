//! The tagged result of one user action.

use crate::types::{BackendFailure, Picture};

/// What a load or regenerate action produced.
///
/// [`Outcome::NoSelection`] is not an error: it means the user
/// cancelled a file dialog, and it drives no visual change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The backend returned a new image.
    Picture(Picture),
    /// The user picked no file.
    NoSelection,
    /// The backend rejected the call; the message is shown verbatim.
    Failure(String),
}

impl From<BackendFailure> for Outcome {
    fn from(failure: BackendFailure) -> Self {
        Self::Failure(failure.into_message())
    }
}
