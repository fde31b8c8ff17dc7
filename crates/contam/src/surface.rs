//! A [`Surface`] that paints the canvas into a PNG file.

use std::io::ErrorKind;
use std::path::PathBuf;

use contam_pipeline::{CHANNELS, CanvasSize, Frame, Picture, Surface, Visibility};
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Largest canvas buffer the preview will allocate.
const MAX_CANVAS_BYTES: usize = 256 * 1024 * 1024;

/// Writes each presented picture, scaled to its canvas size, to an
/// optional preview path.
///
/// The file mirrors the canvas: splash and error frames remove it, and
/// a canvas too large to allocate is skipped and removes it as well.
#[derive(Debug)]
pub struct PreviewSurface {
    path: Option<PathBuf>,
    last: Option<Visibility>,
    controls_enabled: bool,
    written: usize,
}

impl PreviewSurface {
    /// Paint into `path`, or nowhere when `None`.
    #[must_use]
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            last: None,
            controls_enabled: true,
            written: 0,
        }
    }

    /// Visibility of the most recent frame.
    #[must_use]
    pub const fn last_visibility(&self) -> Option<Visibility> {
        self.last
    }

    /// Whether the action controls are enabled.
    #[must_use]
    pub const fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Number of preview files written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    fn paint(&mut self, size: CanvasSize, picture: &Picture) {
        let Some(path) = &self.path else {
            return;
        };
        if canvas_bytes(size).is_none_or(|n| n > MAX_CANVAS_BYTES) {
            log::warn!(
                "canvas {}x{} is too large to preview; skipping",
                size.width,
                size.height
            );
            self.clear();
            return;
        }
        let Some(full) =
            RgbaImage::from_raw(picture.width(), picture.height(), picture.data().to_vec())
        else {
            log::warn!("picture buffer does not match its dimensions");
            return;
        };
        let canvas = imageops::resize(&full, size.width, size.height, FilterType::Triangle);
        match canvas.save(path) {
            Ok(()) => {
                self.written += 1;
                log::info!(
                    "wrote {}x{} preview to {}",
                    size.width,
                    size.height,
                    path.display()
                );
            }
            Err(e) => log::warn!("failed to write preview {}: {e}", path.display()),
        }
    }

    fn clear(&self) {
        let Some(path) = &self.path else {
            return;
        };
        match std::fs::remove_file(path) {
            Ok(()) => log::debug!("removed preview {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("failed to remove preview {}: {e}", path.display()),
        }
    }
}

/// RGBA byte size of a canvas, or `None` on overflow.
fn canvas_bytes(size: CanvasSize) -> Option<usize> {
    usize::try_from(size.width)
        .ok()?
        .checked_mul(usize::try_from(size.height).ok()?)?
        .checked_mul(CHANNELS)
}

impl Surface for PreviewSurface {
    fn present(&mut self, frame: &Frame<'_>) {
        self.last = Some(frame.visibility);
        if let Some((size, picture)) = frame.canvas {
            self.paint(size, picture);
        } else {
            if let Some(message) = frame.error {
                log::debug!("error banner: {message}");
            } else {
                log::debug!("splash");
            }
            self.clear();
        }
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }
}
