//! Saturation and brightness enhancement.
//!
//! Both are blends against a degenerate image, evaluated per channel:
//!
//! ```text
//! out = trunc(clamp(degenerate + factor × (in − degenerate), 0, 255))
//! ```
//!
//! The degenerate image is the luma gray for saturation and black for
//! brightness. `factor = 0` yields the degenerate image, `factor = 1` the
//! input, and `factor > 1` extrapolates away from it.

use crate::color::Color;

/// ITU-R 601-2 luma weights in 16.16 fixed point.
const LUMA_601_FIXED: [u32; 3] = [19595, 38470, 7471];

/// Integer ITU-R 601-2 luma, rounded half up.
pub fn luma(color: Color) -> u8 {
    let sum = LUMA_601_FIXED[0] * u32::from(color.r())
        + LUMA_601_FIXED[1] * u32::from(color.g())
        + LUMA_601_FIXED[2] * u32::from(color.b())
        + 0x8000;
    (sum >> 16) as u8
}

/// Scale saturation by `1 + ds / 100` relative to the color's luma gray.
///
/// `ds = -100` produces a gray with R = G = B.
pub fn apply_saturation(color: Color, ds: f64) -> Color {
    if ds == 0.0 {
        return color;
    }
    let gray = f64::from(luma(color));
    blend(color, gray, 1.0 + ds / 100.0)
}

/// Scale all channels by `1 + dl / 100` relative to black.
///
/// `dl = -100` produces black.
pub fn apply_brightness(color: Color, dl: f64) -> Color {
    if dl == 0.0 {
        return color;
    }
    blend(color, 0.0, 1.0 + dl / 100.0)
}

fn blend(color: Color, degenerate: f64, factor: f64) -> Color {
    let mut out = [0u8; 3];
    for c in 0..3 {
        let v = degenerate + factor * (f64::from(color.0[c]) - degenerate);
        out[c] = v.clamp(0.0, 255.0) as u8;
    }
    Color(out)
}
