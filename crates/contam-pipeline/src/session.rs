//! One user session: parameters, backend, and display wired together.
//!
//! Each action method reads the parameters, builds a request, awaits
//! the backend, and hands the outcome to the presentation controller.
//! Actions take `&mut self`, so a second action cannot start while an
//! earlier one is still awaiting its reply.

use crate::backend::{Backend, BackendClient, Reply};
use crate::outcome::Outcome;
use crate::params::{GradientKind, ParameterModel, Style};
use crate::presentation::{PresentationConfig, PresentationController, Surface};
use crate::request::{Request, RequestBuilder};
use crate::types::{BackendFailure, ConfigError};

/// How an action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// A new picture is on the canvas.
    Shown,
    /// The backend wrote the file; the display is unchanged.
    Saved,
    /// No file was picked; nothing was sent.
    NoSelection,
    /// The backend failed; the error banner is showing.
    Failed,
}

/// The parameter model, backend client, and presentation controller of
/// one running application.
#[derive(Debug)]
pub struct Session<B, S> {
    params: ParameterModel,
    client: BackendClient<B>,
    presentation: PresentationController<S>,
}

impl<B: Backend, S: Surface> Session<B, S> {
    /// Start a session with default parameters, showing the splash.
    pub fn new(backend: B, surface: S, config: PresentationConfig) -> Self {
        Self::with_params(ParameterModel::default(), backend, surface, config)
    }

    /// Start a session with the given parameters.
    pub fn with_params(
        params: ParameterModel,
        backend: B,
        surface: S,
        config: PresentationConfig,
    ) -> Self {
        Self {
            params,
            client: BackendClient::new(backend),
            presentation: PresentationController::new(surface, config),
        }
    }

    /// Current parameters.
    #[must_use]
    pub const fn params(&self) -> &ParameterModel {
        &self.params
    }

    /// Mutable access for the control panel.
    pub const fn params_mut(&mut self) -> &mut ParameterModel {
        &mut self.params
    }

    /// Select a blend style by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownStyle`] and leaves the parameters
    /// unchanged if `name` is not a known style.
    pub fn select_style(&mut self, name: &str) -> Result<(), ConfigError> {
        let style = name.parse::<Style>().inspect_err(|e| log::error!("{e}"))?;
        self.params.style = style;
        Ok(())
    }

    /// Select a gradient shape by name. The radial center is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownGradient`] and leaves the
    /// parameters unchanged if `name` is not a known shape.
    pub fn select_gradient(&mut self, name: &str) -> Result<(), ConfigError> {
        let gradient = name
            .parse::<GradientKind>()
            .inspect_err(|e| log::error!("{e}"))?;
        self.params.gradient = gradient;
        Ok(())
    }

    /// Load the file picked in the open dialog and show its preview.
    ///
    /// `None` or an empty path means the dialog was cancelled: the
    /// backend is not called and the display does not change.
    #[allow(clippy::future_not_send)]
    pub async fn load(&mut self, path: Option<&str>) -> Completion {
        let request = RequestBuilder::new(&self.params).build_load(path.unwrap_or_default());
        let Some(request) = request else {
            return self.show(Outcome::NoSelection);
        };
        log::info!("loading {}", request.path);
        let reply = self.dispatch(&Request::Load(request)).await;
        self.show_picture_reply("get_image", reply)
    }

    /// Re-render the backend's loaded image with the current parameters.
    #[allow(clippy::future_not_send)]
    pub async fn regenerate(&mut self) -> Completion {
        let request = RequestBuilder::new(&self.params).build_regenerate();
        log::info!(
            "regenerating (scale {}, style {}, gradient {})",
            request.params.scale,
            request.params.style,
            request.params.gradient_spec.kind(),
        );
        let reply = self.dispatch(&Request::Regenerate(request)).await;
        self.show_picture_reply("gen_image", reply)
    }

    /// Have the backend re-render and write to the path picked in the
    /// save dialog.
    ///
    /// On success the display is left exactly as it was. On failure the
    /// error banner replaces it. `None` or an empty path means the
    /// dialog was cancelled.
    #[allow(clippy::future_not_send)]
    pub async fn save(&mut self, path: Option<&str>) -> Completion {
        let request = RequestBuilder::new(&self.params).build_save(path.unwrap_or_default());
        let Some(request) = request else {
            return self.show(Outcome::NoSelection);
        };
        log::info!("saving to {}", request.path);
        match self.dispatch(&Request::Save(request)).await {
            Ok(Reply::Saved) => Completion::Saved,
            Ok(Reply::Picture(_)) => self.show(Outcome::Failure(
                "backend returned an image for save_image".into(),
            )),
            Err(failure) => self.show(failure.into()),
        }
    }

    /// The presentation controller.
    #[must_use]
    pub const fn presentation(&self) -> &PresentationController<S> {
        &self.presentation
    }

    /// The backend client.
    #[must_use]
    pub const fn client(&self) -> &BackendClient<B> {
        &self.client
    }

    /// Consumes the session and returns the backend and surface.
    #[must_use]
    pub fn into_parts(self) -> (B, S) {
        (
            self.client.into_backend(),
            self.presentation.into_surface(),
        )
    }

    /// Call the backend with the controls disabled for the duration.
    #[allow(clippy::future_not_send)]
    async fn dispatch(&mut self, request: &Request) -> Result<Reply, BackendFailure> {
        self.presentation.set_controls_enabled(false);
        let reply = self.client.call(request).await;
        self.presentation.set_controls_enabled(true);
        reply
    }

    fn show_picture_reply(
        &mut self,
        command: &str,
        reply: Result<Reply, BackendFailure>,
    ) -> Completion {
        let outcome = match reply {
            Ok(Reply::Picture(picture)) => Outcome::Picture(picture),
            Ok(Reply::Saved) => Outcome::Failure(format!("backend returned no image for {command}")),
            Err(failure) => failure.into(),
        };
        self.show(outcome)
    }

    fn show(&mut self, outcome: Outcome) -> Completion {
        let completion = match &outcome {
            Outcome::Picture(p) => {
                log::info!("showing {}x{} image", p.width(), p.height());
                Completion::Shown
            }
            Outcome::NoSelection => {
                log::info!("no file selected");
                Completion::NoSelection
            }
            Outcome::Failure(message) => {
                log::warn!("showing error: {message}");
                Completion::Failed
            }
        };
        self.presentation.apply(outcome);
        completion
    }
}
