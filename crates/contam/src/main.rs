//! contam: contaminate an image from the command line.
//!
//! Loads an image, displaces its pixels with seeded Gaussian noise,
//! and optionally regenerates, writes an aspect-correct preview, and
//! saves the full-resolution result.
//!
//! # Usage
//!
//! ```text
//! contam photo.png --scale 80 --style lightest --gradient radial \
//!     --center 0.3,0.7 --preview preview.png --save out.png
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod logging;
mod surface;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use contam_engine::LocalBackend;
use contam_pipeline::{
    Completion, ConfigError, ParameterModel, PresentationConfig, Session, VisualState,
};

use crate::logging::init_logging;
use crate::surface::PreviewSurface;

/// Contaminate an image with displaced-pixel noise.
#[derive(Parser)]
#[command(name = "contam", version)]
struct Cli {
    /// Image to load (PNG, JPEG, BMP, WebP). Without it nothing is
    /// loaded.
    input: Option<String>,

    /// Displacement strength (0-300).
    #[arg(long, default_value_t = ParameterModel::DEFAULT_SCALE, allow_negative_numbers = true)]
    scale: f64,

    /// Constant displacement offset (-100-100).
    #[arg(long, default_value_t = ParameterModel::DEFAULT_BIAS, allow_negative_numbers = true)]
    bias: f64,

    /// Blend style (always, lightest, darkest, mix).
    ///
    /// Taken as text so an unknown name is reported as a configuration error.
    #[arg(long, default_value = "always")]
    style: String,

    /// Gradient shape (none, horizontal, vertical, radial).
    ///
    /// Taken as text so an unknown name is reported as a configuration error.
    #[arg(long, default_value = "none")]
    gradient: String,

    /// Radial gradient center as X,Y fractions.
    #[arg(long, default_value = "0.5,0.5")]
    center: String,

    /// Invert the gradient.
    #[arg(long)]
    reverse: bool,

    /// Full parameter set as a JSON string.
    ///
    /// When provided, all other parameter flags are ignored.
    #[arg(long)]
    params_json: Option<String>,

    /// Regenerate after loading.
    #[arg(long)]
    regenerate: bool,

    /// Save the full-resolution result to this path.
    #[arg(long)]
    save: Option<String>,

    /// Write the on-screen canvas to this PNG.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Canvas width in pixels (1-16384).
    #[arg(long, default_value_t = PresentationConfig::DEFAULT_DISPLAY_WIDTH, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..=u64::from(PresentationConfig::MAX_DISPLAY_WIDTH)))]
    display_width: u32,

    /// Noise seed.
    #[arg(long, default_value_t = LocalBackend::DEFAULT_SEED)]
    seed: u64,

    /// Log filter (`env_logger` syntax). Overrides `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

/// Build the [`ParameterModel`] from CLI arguments.
///
/// If `--params-json` is provided it is parsed directly and the
/// individual parameter flags are ignored.
fn params_from_cli(cli: &Cli) -> Result<ParameterModel, ConfigError> {
    if let Some(ref json) = cli.params_json {
        return serde_json::from_str(json).map_err(|e| ConfigError::InvalidPreset(e.to_string()));
    }

    Ok(ParameterModel {
        scale: cli.scale,
        bias: cli.bias,
        style: cli.style.parse()?,
        gradient: cli.gradient.parse()?,
        center: cli.center.parse()?,
        reverse: cli.reverse,
    })
}

/// Run load, then regenerate and save as requested, stopping at the
/// first failure.
#[allow(clippy::future_not_send)]
async fn run_actions(
    session: &mut Session<LocalBackend, PreviewSurface>,
    cli: &Cli,
) -> Completion {
    let mut last = session.load(cli.input.as_deref()).await;
    if last == Completion::Failed {
        return last;
    }
    if cli.regenerate {
        last = session.regenerate().await;
        if last == Completion::Failed {
            return last;
        }
    }
    if let Some(path) = cli.save.as_deref() {
        last = session.save(Some(path)).await;
    }
    last
}

fn describe(session: &Session<LocalBackend, PreviewSurface>) -> String {
    let presentation = session.presentation();
    match presentation.state() {
        VisualState::Splash => "splash".to_owned(),
        VisualState::Image(picture) => {
            let canvas = presentation
                .canvas_size()
                .map(|c| format!(" (canvas {}x{})", c.width, c.height))
                .unwrap_or_default();
            format!("image {}x{}{canvas}", picture.width(), picture.height())
        }
        VisualState::ErrorShown(message) => format!("error: {message}"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.log.as_deref());

    let params = match params_from_cli(&cli) {
        Ok(p) => p,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::with_params(
        params,
        LocalBackend::default().with_seed(cli.seed),
        PreviewSurface::new(cli.preview.clone()),
        PresentationConfig {
            display_width: cli.display_width,
        },
    );

    let completion = pollster::block_on(run_actions(&mut session, &cli));
    log::debug!("last action: {completion:?}");

    println!("{}", describe(&session));

    if session.presentation().visibility().error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use contam_pipeline::{Center, GradientKind, Style};

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("contam").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_parameter_model() {
        let cli = parse(&[]);
        assert_eq!(params_from_cli(&cli).unwrap(), ParameterModel::default());
        assert_eq!(cli.display_width, PresentationConfig::DEFAULT_DISPLAY_WIDTH);
        assert!(cli.input.is_none());
    }

    #[test]
    fn flags_map_onto_parameters() {
        let cli = parse(&[
            "photo.png",
            "--scale",
            "50",
            "--bias",
            "-12",
            "--style",
            "Mix",
            "--gradient",
            "radial",
            "--center",
            "0.3,0.7",
            "--reverse",
        ]);
        let params = params_from_cli(&cli).unwrap();

        assert_eq!(cli.input.as_deref(), Some("photo.png"));
        assert!((params.scale - 50.0).abs() < f64::EPSILON);
        assert!((params.bias + 12.0).abs() < f64::EPSILON);
        assert_eq!(params.style, Style::Mix);
        assert_eq!(params.gradient, GradientKind::Radial);
        assert_eq!(params.center, Center::new(0.3, 0.7));
        assert!(params.reverse);
    }

    #[test]
    fn json_preset_overrides_flags() {
        let cli = parse(&[
            "--style",
            "darkest",
            "--params-json",
            r#"{"scale": 7, "style": "Lightest"}"#,
        ]);
        let params = params_from_cli(&cli).unwrap();

        assert_eq!(params.style, Style::Lightest);
        assert!((params.scale - 7.0).abs() < f64::EPSILON);
        assert_eq!(params.gradient, GradientKind::None);
    }

    #[test]
    fn bad_names_are_config_errors() {
        let cli = parse(&["--gradient", "diagonal"]);
        assert_eq!(
            params_from_cli(&cli).unwrap_err(),
            ConfigError::UnknownGradient("diagonal".into())
        );

        let cli = parse(&["--center", "2,0"]);
        assert!(matches!(
            params_from_cli(&cli).unwrap_err(),
            ConfigError::InvalidCenter(_)
        ));

        let cli = parse(&["--params-json", "{not json"]);
        assert!(matches!(
            params_from_cli(&cli).unwrap_err(),
            ConfigError::InvalidPreset(_)
        ));
    }

    #[test]
    fn display_width_is_bounded() {
        assert_eq!(parse(&["--display-width", "16384"]).display_width, 16384);
        for bad in ["0", "16385", "4000000000"] {
            assert!(
                Cli::try_parse_from(["contam", "--display-width", bad]).is_err(),
                "{bad}"
            );
        }
    }

    #[test]
    fn no_input_leaves_splash() {
        let cli = parse(&[]);
        let mut session = Session::new(
            LocalBackend::default(),
            PreviewSurface::new(None),
            PresentationConfig::default(),
        );

        let completion = pollster::block_on(run_actions(&mut session, &cli));

        assert_eq!(completion, Completion::NoSelection);
        assert_eq!(describe(&session), "splash");
        assert_eq!(session.client().calls(), 0);
    }

    #[test]
    fn regenerate_without_input_uses_placeholder() {
        let cli = parse(&["--regenerate", "--scale", "0"]);
        let mut session = Session::with_params(
            params_from_cli(&cli).unwrap(),
            LocalBackend::default(),
            PreviewSurface::new(None),
            PresentationConfig::default(),
        );

        let completion = pollster::block_on(run_actions(&mut session, &cli));

        assert_eq!(completion, Completion::Shown);
        assert_eq!(describe(&session), "image 1024x924 (canvas 1024x924)");
    }

    #[test]
    fn missing_input_reports_error() {
        let cli = parse(&["/nonexistent/contam/photo.png", "--regenerate"]);
        let mut session = Session::new(
            LocalBackend::default(),
            PreviewSurface::new(None),
            PresentationConfig::default(),
        );

        let completion = pollster::block_on(run_actions(&mut session, &cli));

        assert_eq!(completion, Completion::Failed);
        assert!(describe(&session).starts_with("error: failed to open"));
        // Stopped before regenerating.
        assert_eq!(session.client().calls(), 1);
    }
}
