//! The contamination effect: every output pixel is taken from a randomly
//! displaced source pixel, blended according to the style, with the
//! displacement scaled by the gradient weight.

use contam_pipeline::{EncodedParams, Style};
use image::{Pixel, Rgba, RgbaImage};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::weight::WeightField;

/// Displacement spread per unit of scale, relative to image width.
const SIGMA_DIVISOR: f64 = 4000.0;

/// Lightest and Darkest sample twice as far as the other styles.
const fn spread_factor(style: Style) -> f64 {
    match style {
        Style::Lightest | Style::Darkest => 2.0,
        Style::Always | Style::Mix => 1.0,
    }
}

/// Standard deviation of the displacement, in pixels.
#[must_use]
pub fn sigma(params: &EncodedParams, width: u32) -> f64 {
    spread_factor(params.style) * params.scale * f64::from(width) / SIGMA_DIVISOR
}

/// Contaminate `source` with `params`.
///
/// The random stream is seeded with `seed`, so equal inputs always give
/// equal output. Output has the same dimensions as `source`.
#[must_use]
pub fn contaminate(source: &RgbaImage, params: &EncodedParams, seed: u64) -> RgbaImage {
    let (width, height) = source.dimensions();
    let mut out = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let sigma = sigma(params, width);
    let weights = WeightField::new(params.gradient_spec, params.reverse, width, height);
    log::debug!(
        "contaminating {width}x{height} (sigma {sigma:.3}, bias {}, style {})",
        params.bias,
        params.style,
    );

    // Column-major. The draw order decides which sample lands on which
    // pixel for a given seed.
    for x in 0..width {
        for y in 0..height {
            let weight = weights.at(x, y);
            let zx: f64 = rng.sample(StandardNormal);
            let zy: f64 = rng.sample(StandardNormal);
            let dx = displacement(weight, params.bias, sigma, zx);
            let dy = displacement(weight, params.bias, sigma, zy);

            let sx = displaced(x, dx, width);
            let sy = displaced(y, dy, height);

            let original = source.get_pixel(x, y);
            let candidate = source.get_pixel(sx, sy);
            out.put_pixel(x, y, blend(params.style, *original, *candidate));
        }
    }
    out
}

#[allow(clippy::cast_possible_truncation)]
fn displacement(weight: f64, bias: f64, sigma: f64, z: f64) -> i64 {
    // `as` saturates, and maps NaN to 0.
    (weight * sigma.mul_add(z, bias)).round() as i64
}

/// Apply a displacement along one axis of length `len`.
///
/// A position past the far edge is mirrored back; the result is then
/// clamped into `0..len`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn displaced(pos: u32, delta: i64, len: u32) -> u32 {
    let pos = i64::from(pos);
    let len = i64::from(len);
    let target = pos.saturating_add(delta);
    let target = if target >= len {
        pos.saturating_sub(delta)
    } else {
        target
    };
    target.clamp(0, len - 1) as u32
}

fn blend(style: Style, original: Rgba<u8>, candidate: Rgba<u8>) -> Rgba<u8> {
    match style {
        Style::Always => candidate,
        Style::Lightest => {
            if candidate.to_luma()[0] > original.to_luma()[0] {
                candidate
            } else {
                original
            }
        }
        Style::Darkest => {
            if candidate.to_luma()[0] < original.to_luma()[0] {
                candidate
            } else {
                original
            }
        }
        Style::Mix => original.map2(&candidate, u8::midpoint),
    }
}

#[cfg(test)]
mod tests {
    use contam_pipeline::GradientSpec;

    use super::*;

    fn params(scale: f64, bias: f64, style: Style) -> EncodedParams {
        EncodedParams {
            scale,
            bias,
            style,
            gradient_spec: GradientSpec::None,
            reverse: false,
        }
    }

    /// 64x48 image with a distinct color per pixel.
    fn ramp_image() -> RgbaImage {
        RgbaImage::from_fn(64, 48, |x, y| {
            let r = u8::try_from(x * 4).unwrap_or(u8::MAX);
            let g = u8::try_from(y * 5).unwrap_or(u8::MAX);
            Rgba([r, g, 128, 255])
        })
    }

    #[test]
    fn zero_scale_and_bias_is_identity() {
        let src = ramp_image();
        for style in Style::ALL {
            let out = contaminate(&src, &params(0.0, 0.0, style), 0);
            assert_eq!(out, src, "{style}");
        }
    }

    #[test]
    fn dimensions_are_preserved() {
        let src = ramp_image();
        let out = contaminate(&src, &params(300.0, 20.0, Style::Mix), 3);
        assert_eq!(out.dimensions(), src.dimensions());
    }

    #[test]
    fn same_seed_same_output() {
        let src = ramp_image();
        let p = params(200.0, 0.0, Style::Always);
        assert_eq!(contaminate(&src, &p, 42), contaminate(&src, &p, 42));
    }

    #[test]
    fn different_seed_different_output() {
        let src = ramp_image();
        let p = params(300.0, 0.0, Style::Always);
        assert_ne!(contaminate(&src, &p, 1), contaminate(&src, &p, 2));
    }

    #[test]
    fn nonzero_scale_changes_pixels() {
        let src = ramp_image();
        let out = contaminate(&src, &params(300.0, 0.0, Style::Always), 0);
        assert_ne!(out, src);
    }

    #[test]
    fn lightest_never_darkens_and_darkest_never_lightens() {
        let src = ramp_image();
        let light = contaminate(&src, &params(300.0, 0.0, Style::Lightest), 0);
        let dark = contaminate(&src, &params(300.0, 0.0, Style::Darkest), 0);
        for (x, y, p) in src.enumerate_pixels() {
            let luma = p.to_luma()[0];
            assert!(light.get_pixel(x, y).to_luma()[0] >= luma);
            assert!(dark.get_pixel(x, y).to_luma()[0] <= luma);
        }
    }

    #[test]
    fn reversed_horizontal_leaves_right_column_untouched() {
        let src = ramp_image();
        let p = EncodedParams {
            gradient_spec: GradientSpec::Horizontal,
            reverse: true,
            ..params(300.0, 0.0, Style::Always)
        };
        let out = contaminate(&src, &p, 0);
        let last = src.width() - 1;
        for y in 0..src.height() {
            assert_eq!(out.get_pixel(last, y), src.get_pixel(last, y));
        }
    }

    #[test]
    fn sigma_doubles_for_lightest_and_darkest() {
        let always = sigma(&params(40.0, 0.0, Style::Always), 1000);
        let lightest = sigma(&params(40.0, 0.0, Style::Lightest), 1000);
        assert!((always - 10.0).abs() < 1e-9);
        assert!((lightest - 20.0).abs() < 1e-9);
    }

    #[test]
    fn far_edge_overflow_is_mirrored() {
        assert_eq!(displaced(8, 5, 10), 3);
        assert_eq!(displaced(2, -5, 10), 0);
        assert_eq!(displaced(5, 2, 10), 7);
        assert_eq!(displaced(0, 50, 10), 0);
    }

    #[test]
    fn mix_averages_channels() {
        let out = blend(
            Style::Mix,
            Rgba([0, 100, 200, 255]),
            Rgba([100, 200, 0, 255]),
        );
        assert_eq!(out, Rgba([50, 150, 100, 255]));
    }
}
