//! Presentation state: which of splash, canvas, or error banner is
//! showing.
//!
//! [`PresentationController`] is the only place visibility is decided.
//! Every transition goes through [`PresentationController::apply`], and
//! the three visibility flags are derived from the single
//! [`VisualState`], so they can never disagree.

use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;
use crate::types::Picture;

/// Settings for the display area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// On-screen canvas width in pixels. The canvas height follows
    /// from the picture's aspect ratio.
    pub display_width: u32,
}

impl PresentationConfig {
    /// Default canvas width.
    pub const DEFAULT_DISPLAY_WIDTH: u32 = 1024;
    /// Widest canvas a host should offer.
    pub const MAX_DISPLAY_WIDTH: u32 = 16384;
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            display_width: Self::DEFAULT_DISPLAY_WIDTH,
        }
    }
}

/// What the display area currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VisualState {
    /// Nothing loaded yet.
    #[default]
    Splash,
    /// The last picture the backend returned.
    Image(Picture),
    /// The last backend failure message.
    ErrorShown(String),
}

/// Which panels are visible. Exactly one flag is `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub splash: bool,
    pub canvas: bool,
    pub error: bool,
}

impl Visibility {
    /// Visibility implied by `state`.
    #[must_use]
    pub const fn of(state: &VisualState) -> Self {
        match state {
            VisualState::Splash => Self {
                splash: true,
                canvas: false,
                error: false,
            },
            VisualState::Image(_) => Self {
                splash: false,
                canvas: true,
                error: false,
            },
            VisualState::ErrorShown(_) => Self {
                splash: false,
                canvas: false,
                error: true,
            },
        }
    }

    /// Number of visible panels.
    #[must_use]
    pub fn visible_count(self) -> usize {
        [self.splash, self.canvas, self.error]
            .into_iter()
            .filter(|v| *v)
            .count()
    }
}

/// On-screen canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Fit `picture` to `display_width`, keeping its aspect ratio:
    /// `height = display_width / aspect`, rounded, and never less than
    /// one pixel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fit(display_width: u32, picture: &Picture) -> Self {
        let aspect = picture.aspect_ratio();
        let scaled = (f64::from(display_width) / aspect).round();
        let height = if scaled.is_finite() {
            scaled.clamp(1.0, f64::from(u32::MAX)) as u32
        } else {
            1
        };
        Self {
            width: display_width,
            height,
        }
    }
}

/// Everything a [`Surface`] needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub visibility: Visibility,
    /// Canvas size and full-resolution pixels; `Some` only when the
    /// canvas is visible.
    pub canvas: Option<(CanvasSize, &'a Picture)>,
    /// Error banner text; `Some` only when the banner is visible.
    pub error: Option<&'a str>,
}

/// The display collaborator: splash panel, canvas, error banner, and
/// the action controls.
///
/// The picture in a [`Frame`] is unscaled; the surface paints it at
/// the frame's [`CanvasSize`].
pub trait Surface {
    /// Draw `frame`, replacing whatever was shown before.
    fn present(&mut self, frame: &Frame<'_>);

    /// Enable or disable the load, regenerate, and save controls.
    fn set_controls_enabled(&mut self, enabled: bool) {
        let _ = enabled;
    }
}

/// The splash / image / error state machine.
#[derive(Debug)]
pub struct PresentationController<S> {
    surface: S,
    config: PresentationConfig,
    state: VisualState,
    controls_enabled: bool,
}

impl<S: Surface> PresentationController<S> {
    /// Start in [`VisualState::Splash`] and present it.
    pub fn new(surface: S, config: PresentationConfig) -> Self {
        let mut controller = Self {
            surface,
            config,
            state: VisualState::Splash,
            controls_enabled: true,
        };
        controller.present();
        controller
    }

    /// Apply an outcome.
    ///
    /// A picture replaces the canvas, a failure replaces the banner,
    /// and [`Outcome::NoSelection`] changes nothing. Returns whether a
    /// transition happened.
    pub fn apply(&mut self, outcome: Outcome) -> bool {
        self.state = match outcome {
            Outcome::NoSelection => return false,
            Outcome::Picture(picture) => VisualState::Image(picture),
            Outcome::Failure(message) => VisualState::ErrorShown(message),
        };
        self.present();
        true
    }

    /// Enable or disable the action controls on the surface.
    pub fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
        self.surface.set_controls_enabled(enabled);
    }

    /// Whether the action controls are currently enabled.
    #[must_use]
    pub const fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &VisualState {
        &self.state
    }

    /// Current visibility flags.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        Visibility::of(&self.state)
    }

    /// Canvas size for the shown picture, if any.
    #[must_use]
    pub fn canvas_size(&self) -> Option<CanvasSize> {
        self.frame().canvas.map(|(size, _)| size)
    }

    /// Error banner text, if shown.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.frame().error
    }

    /// The current frame.
    #[must_use]
    pub fn frame(&self) -> Frame<'_> {
        frame_of(&self.state, self.config)
    }

    /// The display collaborator.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Consumes the controller and returns the surface.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }

    fn present(&mut self) {
        let frame = frame_of(&self.state, self.config);
        self.surface.present(&frame);
    }
}

fn frame_of(state: &VisualState, config: PresentationConfig) -> Frame<'_> {
    match state {
        VisualState::Splash => Frame {
            visibility: Visibility::of(state),
            canvas: None,
            error: None,
        },
        VisualState::Image(p) => Frame {
            visibility: Visibility::of(state),
            canvas: Some((
                CanvasSize::fit(config.display_width, p),
                p,
            )),
            error: None,
        },
        VisualState::ErrorShown(message) => Frame {
            visibility: Visibility::of(state),
            canvas: None,
            error: Some(message),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CHANNELS;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Presented {
        visibility: Visibility,
        canvas: Option<CanvasSize>,
        error: Option<String>,
    }

    #[derive(Default)]
    struct RecordingSurface {
        frames: Vec<Presented>,
        controls: Vec<bool>,
    }

    impl Surface for RecordingSurface {
        fn present(&mut self, frame: &Frame<'_>) {
            self.frames.push(Presented {
                visibility: frame.visibility,
                canvas: frame.canvas.map(|(size, _)| size),
                error: frame.error.map(str::to_owned),
            });
        }

        fn set_controls_enabled(&mut self, enabled: bool) {
            self.controls.push(enabled);
        }
    }

    fn picture(width: u32, height: u32) -> Picture {
        Picture::new(width, height, vec![0; (width * height) as usize * CHANNELS]).unwrap()
    }

    fn controller() -> PresentationController<RecordingSurface> {
        PresentationController::new(RecordingSurface::default(), PresentationConfig::default())
    }

    #[test]
    fn starts_on_splash_and_presents_it() {
        let c = controller();
        assert_eq!(c.state(), &VisualState::Splash);
        assert_eq!(c.surface().frames.len(), 1);
        assert!(c.surface().frames[0].visibility.splash);
        assert_eq!(c.visibility().visible_count(), 1);
    }

    #[test]
    fn picture_shows_canvas_only() {
        let mut c = controller();
        assert!(c.apply(Outcome::Picture(picture(400, 200))));

        let v = c.visibility();
        assert!(v.canvas && !v.splash && !v.error);
        assert_eq!(v.visible_count(), 1);
        assert_eq!(
            c.canvas_size(),
            Some(CanvasSize {
                width: 1024,
                height: 512
            })
        );
        assert_eq!(c.error_message(), None);
    }

    #[test]
    fn failure_shows_banner_and_hides_canvas() {
        let mut c = controller();
        c.apply(Outcome::Picture(picture(10, 10)));
        c.apply(Outcome::Failure("disk full".into()));

        let v = c.visibility();
        assert!(v.error && !v.canvas && !v.splash);
        assert_eq!(c.error_message(), Some("disk full"));
        assert_eq!(c.canvas_size(), None);

        let last = c.surface().frames.last().unwrap();
        assert_eq!(last.error.as_deref(), Some("disk full"));
        assert_eq!(last.canvas, None);
    }

    #[test]
    fn picture_after_failure_clears_banner() {
        let mut c = controller();
        c.apply(Outcome::Failure("unreadable".into()));
        c.apply(Outcome::Picture(picture(3, 4)));

        assert_eq!(c.error_message(), None);
        assert!(c.visibility().canvas);
        assert_eq!(c.surface().frames.last().unwrap().error, None);
    }

    #[test]
    fn no_selection_is_a_no_op() {
        let mut c = controller();
        c.apply(Outcome::Picture(picture(8, 8)));
        let frames_before = c.surface().frames.len();
        let state_before = c.state().clone();

        assert!(!c.apply(Outcome::NoSelection));

        assert_eq!(c.state(), &state_before);
        assert_eq!(c.surface().frames.len(), frames_before);
    }

    #[test]
    fn exactly_one_panel_visible_after_every_transition() {
        let mut c = controller();
        let outcomes = [
            Outcome::Picture(picture(5, 9)),
            Outcome::NoSelection,
            Outcome::Failure("bad".into()),
            Outcome::Failure("worse".into()),
            Outcome::Picture(picture(9, 5)),
        ];
        for outcome in outcomes {
            c.apply(outcome);
            assert_eq!(c.visibility().visible_count(), 1);
        }
        for frame in &c.surface().frames {
            assert_eq!(frame.visibility.visible_count(), 1);
        }
    }

    #[test]
    fn canvas_height_follows_aspect_ratio() {
        assert_eq!(CanvasSize::fit(1024, &picture(400, 200)).height, 512);
        assert_eq!(CanvasSize::fit(1024, &picture(200, 400)).height, 2048);
        assert_eq!(CanvasSize::fit(1000, &picture(3, 2)).height, 667);
        assert_eq!(CanvasSize::fit(800, &picture(800, 800)).height, 800);
    }

    #[test]
    fn canvas_height_never_collapses_to_zero() {
        assert_eq!(CanvasSize::fit(10, &picture(10_000, 1)).height, 1);
    }

    #[test]
    fn display_width_comes_from_config() {
        let mut c = PresentationController::new(
            RecordingSurface::default(),
            PresentationConfig { display_width: 600 },
        );
        c.apply(Outcome::Picture(picture(300, 100)));
        assert_eq!(
            c.canvas_size(),
            Some(CanvasSize {
                width: 600,
                height: 200
            })
        );
    }

    #[test]
    fn controls_toggle_reaches_surface() {
        let mut c = controller();
        c.set_controls_enabled(false);
        assert!(!c.controls_enabled());
        c.set_controls_enabled(true);
        assert_eq!(c.surface().controls, vec![false, true]);
    }
}
