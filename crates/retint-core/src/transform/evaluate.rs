//! Core transform evaluation: applies the full recolor chain to one color.

use crate::color::Color;
use crate::grading::{apply_brightness, apply_hue_shift, apply_mask, apply_saturation};
use crate::transform::params::TransformParameters;

/// Applies the complete recolor chain to a single RGB color:
/// 1. Additive RGB mask
/// 2. Hue shift
/// 3. Saturation scale
/// 4. Lightness scale
/// 5. Secondary lightness scale
///
/// Every stage requantizes to 8 bits, so clamping happens between stages
/// and not only at the end. Alpha is the caller's concern; see
/// [`crate::color::is_transparent`].
pub fn transform(color: Color, params: &TransformParameters) -> Color {
    let c = apply_mask(color, params.dr, params.dg, params.db);
    let c = apply_hue_shift(c, params.dh);
    let c = apply_saturation(c, params.ds);
    let c = apply_brightness(c, params.dl);
    apply_brightness(c, params.final_dl)
}

/// [`transform`] on an RGBA pixel, keeping its alpha.
pub fn transform_pixel(px: [u8; 4], params: &TransformParameters) -> [u8; 4] {
    transform(Color::from_rgba(px), params).with_alpha(px[3])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_colors() -> Vec<Color> {
        let mut colors = Vec::new();
        for r in (0..=255).step_by(51) {
            for g in (0..=255).step_by(85) {
                for b in (0..=255).step_by(64) {
                    colors.push(Color::new(r as u8, g as u8, b as u8));
                }
            }
        }
        colors.push(Color::new(255, 255, 255));
        colors
    }

    #[test]
    fn test_identity_is_exact() {
        for c in sample_colors() {
            assert_eq!(transform(c, &TransformParameters::IDENTITY), c);
        }
    }

    #[test]
    fn test_hue_period_is_360() {
        let base = TransformParameters {
            dr: 12.5,
            dg: -30.0,
            db: 4.0,
            ds: -20.0,
            dl: 10.0,
            final_dl: -5.0,
            ..TransformParameters::IDENTITY
        };
        let turned = TransformParameters { dh: 360.0, ..base };
        for c in sample_colors() {
            assert_eq!(transform(c, &turned), transform(c, &base), "color {c}");
        }
    }

    #[test]
    fn test_full_desaturation_is_gray() {
        let p = TransformParameters::hsl(37.0, -100.0, 0.0);
        for c in sample_colors() {
            assert!(transform(c, &p).is_gray());
        }
    }

    #[test]
    fn test_full_darkening_is_black() {
        let p = TransformParameters {
            dr: 40.0,
            ds: 50.0,
            dl: -100.0,
            ..TransformParameters::IDENTITY
        };
        for c in sample_colors() {
            assert_eq!(transform(c, &p), Color::BLACK);
        }
    }

    #[test]
    fn test_secondary_lightness_applies_after_primary() {
        let c = Color::new(200, 100, 50);
        let both = TransformParameters {
            dl: 30.0,
            final_dl: -50.0,
            ..TransformParameters::IDENTITY
        };
        // 200 × 1.3 = 260 → 255, then × 0.5 → 127; a single 0.65 pass would give 130.
        assert_eq!(transform(c, &both).r(), 127);
    }

    #[test]
    fn test_known_hsl_match() {
        let p = TransformParameters::hsl(-90.0, 0.0, -50.0);
        assert_eq!(transform(Color::new(100, 150, 200), &p), Color::new(50, 100, 50));
    }

    #[test]
    fn test_hair_params_stay_in_range() {
        let p = TransformParameters::from_slice(&[
            4.4399, -249.6927, -236.8324, -2.9640, -92.7837, 30.4192, -5.0,
        ])
        .unwrap();
        for c in sample_colors() {
            let out = transform(c, &p);
            // Green and blue are masked to zero before the HSL stages, and the
            // heavy desaturation leaves a near-gray result.
            assert!(out.r().abs_diff(out.g()) < 40, "{c} -> {out}");
        }
    }

    #[test]
    fn test_pixel_keeps_alpha() {
        let p = TransformParameters::hsl(0.0, 0.0, -100.0);
        assert_eq!(transform_pixel([9, 9, 9, 42], &p), [0, 0, 0, 42]);
    }
}
