//! Additive RGB mask.

use crate::color::Color;

/// Add per-channel offsets, clamp to `[0, 255]`, then truncate.
///
/// ```text
/// out = floor(clamp(c + d, 0, 255))
/// ```
pub fn apply_mask(color: Color, dr: f64, dg: f64, db: f64) -> Color {
    if dr == 0.0 && dg == 0.0 && db == 0.0 {
        return color;
    }

    let deltas = [dr, dg, db];
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = (f64::from(color.0[c]) + deltas[c]).clamp(0.0, 255.0) as u8;
    }
    Color(out)
}
