//! The asynchronous boundary to whatever performs the contamination.
//!
//! [`Backend`] mirrors the three backend commands one-to-one.
//! [`BackendClient`] wraps a backend, dispatches each [`Request`]
//! exactly once, and logs the exchange. A failed call is returned as-is
//! and never retried.

use crate::request::{LoadRequest, RegenRequest, Request, SaveRequest};
use crate::types::{BackendFailure, Picture};

/// Something that can load, regenerate, and save contaminated images.
///
/// The backend owns the "current loaded image": [`get_image`] replaces
/// it, and [`gen_image`] and [`save_image`] read it.
///
/// [`get_image`]: Self::get_image
/// [`gen_image`]: Self::gen_image
/// [`save_image`]: Self::save_image
#[allow(async_fn_in_trait)] // single-threaded UI callers; Send is not needed
pub trait Backend {
    /// Load the file at `request.path` and return its preview.
    async fn get_image(&mut self, request: &LoadRequest) -> Result<Picture, BackendFailure>;

    /// Re-render the loaded source with new parameters.
    async fn gen_image(&mut self, request: &RegenRequest) -> Result<Picture, BackendFailure>;

    /// Re-render the loaded source and write it to `request.path`.
    async fn save_image(&mut self, request: &SaveRequest) -> Result<(), BackendFailure>;
}

/// A successful backend reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `get_image` or `gen_image` produced an image.
    Picture(Picture),
    /// `save_image` finished writing.
    Saved,
}

/// Dispatches requests to a [`Backend`], one call per request.
#[derive(Debug)]
pub struct BackendClient<B> {
    backend: B,
    calls: u64,
}

impl<B: Backend> BackendClient<B> {
    /// Wrap a backend.
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend, calls: 0 }
    }

    /// Send `request` and await its single reply.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`BackendFailure`] unchanged.
    #[allow(clippy::future_not_send)]
    pub async fn call(&mut self, request: &Request) -> Result<Reply, BackendFailure> {
        self.calls += 1;
        let command = request.command();
        log::debug!("backend call #{}: {command}", self.calls);

        let result = match request {
            Request::Load(req) => self.backend.get_image(req).await.map(Reply::Picture),
            Request::Regenerate(req) => self.backend.gen_image(req).await.map(Reply::Picture),
            Request::Save(req) => self.backend.save_image(req).await.map(|()| Reply::Saved),
        };

        match &result {
            Ok(Reply::Picture(p)) => {
                log::debug!("{command} returned {}x{}", p.width(), p.height());
            }
            Ok(Reply::Saved) => log::debug!("{command} finished"),
            Err(failure) => log::warn!("{command} failed: {failure}"),
        }
        result
    }

    /// Number of calls issued so far.
    #[must_use]
    pub const fn calls(&self) -> u64 {
        self.calls
    }

    /// The wrapped backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the client and returns the backend.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }
}
