//! Gradient weighting: how strongly contamination applies at each pixel.

use contam_pipeline::GradientSpec;

/// Per-pixel contamination strength in `[0, 1]` for one image size.
///
/// Built once per render so the radial normalization is computed a
/// single time rather than per pixel.
#[derive(Debug, Clone, Copy)]
pub struct WeightField {
    spec: GradientSpec,
    reverse: bool,
    width: f64,
    height: f64,
    /// Radial center in pixels.
    center: (f64, f64),
    /// Distance from the radial center to the farthest corner.
    max_distance: f64,
}

impl WeightField {
    /// Prepare the weighting for a `width x height` image.
    #[must_use]
    pub fn new(spec: GradientSpec, reverse: bool, width: u32, height: u32) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        let center = match spec {
            GradientSpec::Radial { x, y } => (x * w, y * h),
            GradientSpec::None | GradientSpec::Horizontal | GradientSpec::Vertical => {
                (w / 2.0, h / 2.0)
            }
        };
        let max_distance = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)]
            .into_iter()
            .map(|(cx, cy)| (cx - center.0).hypot(cy - center.1))
            .fold(0.0, f64::max);
        Self {
            spec,
            reverse,
            width: w,
            height: h,
            center,
            max_distance,
        }
    }

    /// Weight at pixel `(x, y)`.
    ///
    /// Uniform weighting has no direction, so `reverse` leaves it at 1.
    #[must_use]
    pub fn at(&self, x: u32, y: u32) -> f64 {
        let weight = match self.spec {
            GradientSpec::None => return 1.0,
            GradientSpec::Horizontal => ramp(f64::from(x), self.width),
            GradientSpec::Vertical => ramp(f64::from(y), self.height),
            GradientSpec::Radial { .. } => {
                if self.max_distance > f64::EPSILON {
                    let d = (f64::from(x) - self.center.0).hypot(f64::from(y) - self.center.1);
                    (d / self.max_distance).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
        };
        if self.reverse { 1.0 - weight } else { weight }
    }
}

/// `pos / (len - 1)`, so the first pixel is 0 and the last is 1.
fn ramp(pos: f64, len: f64) -> f64 {
    if len > 1.0 {
        (pos / (len - 1.0)).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn none_is_uniform_even_reversed() {
        let field = WeightField::new(GradientSpec::None, true, 10, 10);
        assert!(close(field.at(0, 0), 1.0));
        assert!(close(field.at(9, 9), 1.0));
    }

    #[test]
    fn horizontal_ramps_left_to_right() {
        let field = WeightField::new(GradientSpec::Horizontal, false, 11, 3);
        assert!(close(field.at(0, 1), 0.0));
        assert!(close(field.at(5, 1), 0.5));
        assert!(close(field.at(10, 1), 1.0));
    }

    #[test]
    fn vertical_reverse_flips_polarity() {
        let field = WeightField::new(GradientSpec::Vertical, true, 3, 5);
        assert!(close(field.at(1, 0), 1.0));
        assert!(close(field.at(1, 4), 0.0));
    }

    #[test]
    fn radial_is_zero_at_center_and_one_at_farthest_corner() {
        let field = WeightField::new(GradientSpec::Radial { x: 0.0, y: 0.0 }, false, 10, 10);
        assert!(close(field.at(0, 0), 0.0));
        let corner = field.at(9, 9);
        assert!(corner > 0.85 && corner <= 1.0);
    }

    #[test]
    fn radial_reverse_is_strongest_at_center() {
        let field = WeightField::new(GradientSpec::Radial { x: 0.5, y: 0.5 }, true, 20, 20);
        assert!(close(field.at(10, 10), 1.0));
        assert!(field.at(0, 0) < field.at(10, 10));
    }

    #[test]
    fn single_pixel_ramp_is_full_strength() {
        let field = WeightField::new(GradientSpec::Horizontal, false, 1, 1);
        assert!(close(field.at(0, 0), 1.0));
    }
}
