//! Hue rotation through the HSL representation.

use palette::{FromColor, Hsl, RgbHue, Srgb};

use crate::color::Color;

/// Rotate the hue by `dh` degrees and requantize to 8 bits.
///
/// The color is normalized to `[0, 1]`, converted to HSL, its hue becomes
/// `(h + dh) mod 360` (Euclidean, so negative deltas wrap), and the result
/// is converted back and rounded to the nearest integer.
///
/// Achromatic colors carry no hue and pass through unchanged up to rounding.
pub fn apply_hue_shift(color: Color, dh: f64) -> Color {
    if dh == 0.0 {
        return color;
    }

    let rgb = Srgb::<f64>::new(
        f64::from(color.r()) / 255.0,
        f64::from(color.g()) / 255.0,
        f64::from(color.b()) / 255.0,
    );
    let mut hsl: Hsl<palette::encoding::Srgb, f64> = Hsl::from_color(rgb);

    let hue = (hsl.hue.into_positive_degrees() + dh).rem_euclid(360.0);
    hsl.hue = RgbHue::from_degrees(hue);

    let out: Srgb<f64> = Srgb::from_color(hsl);
    Color([quantize(out.red), quantize(out.green), quantize(out.blue)])
}

fn quantize(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_rotations() {
        let red = Color::new(255, 0, 0);
        assert_eq!(apply_hue_shift(red, 120.0), Color::new(0, 255, 0));
        assert_eq!(apply_hue_shift(red, 240.0), Color::new(0, 0, 255));
        assert_eq!(apply_hue_shift(red, -120.0), Color::new(0, 0, 255));
    }

    #[test]
    fn test_full_turn_matches_no_shift() {
        let c = Color::new(100, 150, 200);
        assert_eq!(apply_hue_shift(c, 360.0), c);
        assert_eq!(apply_hue_shift(c, -360.0), c);
        assert_eq!(apply_hue_shift(c, 720.0), c);
    }

    #[test]
    fn test_negative_shift_wraps() {
        let c = Color::new(100, 150, 200);
        assert_eq!(apply_hue_shift(c, -90.0), apply_hue_shift(c, 270.0));
        assert_eq!(apply_hue_shift(c, -90.0), Color::new(100, 200, 100));
    }

    #[test]
    fn test_gray_is_unaffected() {
        let gray = Color::new(77, 77, 77);
        assert_eq!(apply_hue_shift(gray, 45.0), gray);
    }
}
