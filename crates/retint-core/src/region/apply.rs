//! Apply fitted or configured parameters over rectangular regions.
//!
//! Reads always come from the source image, so overlapping rectangles of
//! one region transform a pixel once; where two regions overlap the later
//! one wins. Transparent pixels and pixels outside every rectangle are
//! copied unchanged.

use rayon::prelude::*;
use serde::Serialize;

use crate::color::is_transparent;
use crate::image::{Rect, TextureImage};
use crate::region::config::TextureRegions;
use crate::transform::evaluate::transform_pixel;
use crate::transform::params::TransformParameters;

/// Per-region summary of an application pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub name: String,
    pub rects: usize,
    /// Opaque pixels written by this region.
    pub pixels: usize,
}

/// Recolor every non-transparent pixel of `source` inside `rects`.
pub fn apply_params_to_rects(
    source: &TextureImage,
    params: &TransformParameters,
    rects: &[Rect],
    tolerance: u8,
) -> TextureImage {
    let mut out = source.clone();
    apply_into(source, &mut out, params, rects, tolerance);
    out
}

/// Apply every region of one texture in order.
pub fn apply_regions(
    source: &TextureImage,
    regions: &TextureRegions,
    tolerance: u8,
) -> (TextureImage, Vec<RegionReport>) {
    let mut out = source.clone();
    let mut reports = Vec::with_capacity(regions.len());
    for (name, region) in regions {
        tracing::info!(
            "processing region '{name}' ({} rectangles)",
            region.rects.len()
        );
        let pixels = apply_into(source, &mut out, &region.params, &region.rects, tolerance);
        reports.push(RegionReport {
            name: name.clone(),
            rects: region.rects.len(),
            pixels,
        });
    }
    (out, reports)
}

/// Writes into `out`, reading from `source`. Returns the number of pixels
/// written.
fn apply_into(
    source: &TextureImage,
    out: &mut TextureImage,
    params: &TransformParameters,
    rects: &[Rect],
    tolerance: u8,
) -> usize {
    let (width, height) = source.dimensions();
    let clipped: Vec<Rect> = rects
        .iter()
        .map(|r| {
            let c = r.clip_to(width, height);
            if c != *r {
                tracing::warn!(
                    "rectangle {:?} clipped to {width}x{height} image",
                    <[u32; 4]>::from(*r)
                );
            }
            c
        })
        .filter(|r| !r.is_empty())
        .collect();
    if clipped.is_empty() || width == 0 {
        return 0;
    }

    out.pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .map(|(y, row)| {
            let y = y as u32;
            let src = source.row(y);
            let mut written = 0usize;
            for (x, (dst, &px)) in row.iter_mut().zip(src).enumerate() {
                let x = x as u32;
                if is_transparent(px, tolerance) || !clipped.iter().any(|r| r.contains(x, y)) {
                    continue;
                }
                *dst = transform_pixel(px, params);
                written += 1;
            }
            written
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, TRANSPARENCY_TOLERANCE};
    use crate::region::config::Region;
    use crate::transform::evaluate::transform;

    fn darken() -> TransformParameters {
        TransformParameters::hsl(0.0, 0.0, -50.0)
    }

    #[test]
    fn test_uniform_square_recolors_identically() {
        let src = TextureImage::new(2, 2, [100, 150, 200, 255]);
        let out = apply_params_to_rects(&src, &darken(), &[Rect::new(0, 0, 2, 2)], TRANSPARENCY_TOLERANCE);
        let expected = transform(Color::new(100, 150, 200), &darken()).with_alpha(255);
        assert!(out.pixels.iter().all(|px| *px == expected));
        assert_eq!(expected, [50, 75, 100, 255]);
    }

    #[test]
    fn test_transparent_pixel_is_untouched() {
        let mut src = TextureImage::new(2, 2, [100, 150, 200, 255]);
        src.pixels[3] = [100, 150, 200, 9];
        let out = apply_params_to_rects(&src, &darken(), &[Rect::new(0, 0, 2, 2)], TRANSPARENCY_TOLERANCE);
        assert_eq!(out.pixels[3], [100, 150, 200, 9]);
        assert_eq!(out.pixels[0], [50, 75, 100, 255]);
    }

    #[test]
    fn test_pixels_outside_rects_are_copied() {
        let src = TextureImage::new(4, 1, [200, 200, 200, 255]);
        let out = apply_params_to_rects(&src, &darken(), &[Rect::new(1, 0, 3, 1)], TRANSPARENCY_TOLERANCE);
        assert_eq!(out.pixels[0], [200, 200, 200, 255]);
        assert_eq!(out.pixels[1], [100, 100, 100, 255]);
        assert_eq!(out.pixels[2], [100, 100, 100, 255]);
        assert_eq!(out.pixels[3], [200, 200, 200, 255]);
    }

    #[test]
    fn test_overlapping_rects_transform_once() {
        let src = TextureImage::new(3, 3, [200, 200, 200, 255]);
        let rects = [Rect::new(0, 0, 2, 2), Rect::new(1, 1, 3, 3)];
        let out = apply_params_to_rects(&src, &darken(), &rects, TRANSPARENCY_TOLERANCE);
        assert_eq!(out.get(1, 1), Some([100, 100, 100, 255]));
    }

    #[test]
    fn test_out_of_bounds_rect_is_clipped() {
        let src = TextureImage::new(2, 2, [200, 200, 200, 255]);
        let out = apply_params_to_rects(&src, &darken(), &[Rect::new(1, 1, 50, 50)], TRANSPARENCY_TOLERANCE);
        assert_eq!(out.get(1, 1), Some([100, 100, 100, 255]));
        assert_eq!(out.get(0, 0), Some([200, 200, 200, 255]));
    }

    #[test]
    fn test_later_region_wins_and_reads_source() {
        let src = TextureImage::new(2, 1, [200, 200, 200, 255]);
        let mut regions = TextureRegions::new();
        regions.insert(
            "first".into(),
            Region {
                params: darken(),
                rects: vec![Rect::new(0, 0, 2, 1)],
            },
        );
        regions.insert(
            "second".into(),
            Region {
                params: TransformParameters::hsl(0.0, 0.0, -100.0),
                rects: vec![Rect::new(1, 0, 2, 1)],
            },
        );
        let (out, reports) = apply_regions(&src, &regions, TRANSPARENCY_TOLERANCE);
        assert_eq!(out.pixels[0], [100, 100, 100, 255]);
        assert_eq!(out.pixels[1], [0, 0, 0, 255]);
        assert_eq!(reports[0].pixels, 2);
        assert_eq!(reports[1].pixels, 1);
        assert_eq!(reports[1].name, "second");
    }
}
