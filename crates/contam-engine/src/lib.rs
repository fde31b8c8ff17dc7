//! contam-engine: an in-process contamination backend.
//!
//! [`LocalBackend`] implements [`contam_pipeline::Backend`] by decoding
//! files with the `image` crate and running [`contaminate`] on the
//! held source image. It starts with a built-in placeholder, so
//! `gen_image` works before anything is loaded.

pub mod contaminate;
pub mod weight;

use std::path::Path;

use contam_pipeline::{
    Backend, BackendFailure, EncodedParams, LoadRequest, Picture, PictureError, RegenRequest,
    SaveRequest,
};
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};

pub use contaminate::contaminate;
pub use weight::WeightField;

/// Errors from the local backend.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A load or save was requested without a path.
    #[error("no file path given")]
    EmptyPath,

    /// The file could not be read or decoded.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// The file could not be encoded or written.
    #[error("failed to save {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// The rendered image could not be turned into a [`Picture`].
    #[error(transparent)]
    Picture(#[from] PictureError),
}

impl From<EngineError> for BackendFailure {
    fn from(e: EngineError) -> Self {
        Self::new(e.to_string())
    }
}

/// Backend that keeps the current source image in memory.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    source: RgbaImage,
    seed: u64,
}

impl LocalBackend {
    /// Seed used unless [`with_seed`](Self::with_seed) overrides it.
    pub const DEFAULT_SEED: u64 = 0;

    /// Placeholder width.
    pub const PLACEHOLDER_WIDTH: u32 = 1024;
    /// Placeholder height.
    pub const PLACEHOLDER_HEIGHT: u32 = 924;

    /// Start with `source` as the loaded image.
    #[must_use]
    pub const fn new(source: RgbaImage) -> Self {
        Self {
            source,
            seed: Self::DEFAULT_SEED,
        }
    }

    /// Use `seed` for every render.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The built-in source: a rust top-left quadrant, a lavender
    /// bottom-right quadrant, and white elsewhere.
    #[must_use]
    pub fn placeholder() -> RgbaImage {
        let half_w = Self::PLACEHOLDER_WIDTH / 2;
        let half_h = Self::PLACEHOLDER_HEIGHT / 2;
        RgbaImage::from_fn(Self::PLACEHOLDER_WIDTH, Self::PLACEHOLDER_HEIGHT, |x, y| {
            if x < half_w && y < half_h {
                Rgba([150, 55, 10, 255])
            } else if x > half_w && y > half_h {
                Rgba([140, 135, 165, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    /// The currently loaded source image.
    #[must_use]
    pub const fn source(&self) -> &RgbaImage {
        &self.source
    }

    /// The render seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Decode `path` and make it the loaded source.
    ///
    /// The format is sniffed from the file contents, falling back to the
    /// extension. The previous source is kept if decoding fails.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyPath`] or [`EngineError::Open`].
    pub fn load(&mut self, path: &str) -> Result<(), EngineError> {
        let path = non_empty(path)?;
        let decoded = ImageReader::open(path)
            .and_then(ImageReader::with_guessed_format)
            .map_err(image::ImageError::from)
            .and_then(ImageReader::decode)
            .map_err(|source| EngineError::Open {
                path: path.to_owned(),
                source,
            })?;
        self.source = decoded.into_rgba8();
        log::info!(
            "loaded {}x{} source from {path}",
            self.source.width(),
            self.source.height()
        );
        Ok(())
    }

    /// Contaminate the loaded source with `params`.
    #[must_use]
    pub fn render(&self, params: &EncodedParams) -> RgbaImage {
        contaminate(&self.source, params, self.seed)
    }

    /// Render and convert to a [`Picture`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Picture`] if the source has a zero
    /// dimension.
    pub fn preview(&self, params: &EncodedParams) -> Result<Picture, EngineError> {
        let rendered = self.render(params);
        let (width, height) = rendered.dimensions();
        Ok(Picture::new(width, height, rendered.into_raw())?)
    }

    /// Render and write to `path`. The format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyPath`] or [`EngineError::Save`].
    pub fn save(&self, path: &str, params: &EncodedParams) -> Result<(), EngineError> {
        let path = non_empty(path)?;
        let save_err = |source| EngineError::Save {
            path: path.to_owned(),
            source,
        };
        let format = ImageFormat::from_path(Path::new(path)).map_err(save_err)?;
        let rendered = self.render(params);
        // JPEG has no alpha channel.
        let result = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgba8(rendered)
                .into_rgb8()
                .save_with_format(path, format)
        } else {
            rendered.save_with_format(path, format)
        };
        result.map_err(save_err)?;
        log::info!("saved {path}");
        Ok(())
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new(Self::placeholder())
    }
}

impl Backend for LocalBackend {
    async fn get_image(&mut self, request: &LoadRequest) -> Result<Picture, BackendFailure> {
        self.load(&request.path)?;
        Ok(self.preview(&request.params)?)
    }

    async fn gen_image(&mut self, request: &RegenRequest) -> Result<Picture, BackendFailure> {
        Ok(self.preview(&request.params)?)
    }

    async fn save_image(&mut self, request: &SaveRequest) -> Result<(), BackendFailure> {
        Ok(self.save(&request.path, &request.params)?)
    }
}

/// `path` unchanged, unless it is empty or only whitespace.
fn non_empty(path: &str) -> Result<&str, EngineError> {
    if path.trim().is_empty() {
        Err(EngineError::EmptyPath)
    } else {
        Ok(path)
    }
}
