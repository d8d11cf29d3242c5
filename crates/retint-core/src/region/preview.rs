//! Diagnostic overlays: region outlines and sampled anchor markers.

use crate::image::{Rect, TextureImage};

pub const PREVIEW_COLOR: [u8; 4] = [255, 0, 0, 255];
/// Outline thickness in pixels, drawn inside the rectangle.
pub const OUTLINE_WIDTH: u32 = 2;
/// Half-size of an anchor marker (a 3×3 square).
const MARKER_RADIUS: u32 = 1;

/// Copy of `image` with every rectangle outlined in red.
pub fn draw_region_preview<'a>(
    image: &TextureImage,
    rects: impl IntoIterator<Item = &'a Rect>,
) -> TextureImage {
    let mut out = image.clone();
    let (width, height) = out.dimensions();
    for rect in rects {
        let r = rect.clip_to(width, height);
        if r.is_empty() {
            continue;
        }
        let t = OUTLINE_WIDTH.min(r.width()).min(r.height());
        fill(&mut out, Rect::new(r.left, r.top, r.right, r.top + t));
        fill(&mut out, Rect::new(r.left, r.bottom - t, r.right, r.bottom));
        fill(&mut out, Rect::new(r.left, r.top, r.left + t, r.bottom));
        fill(&mut out, Rect::new(r.right - t, r.top, r.right, r.bottom));
    }
    out
}

/// Copy of `image` with a red 3×3 marker centred on every point.
pub fn draw_anchor_preview(image: &TextureImage, points: &[(u32, u32)]) -> TextureImage {
    let mut out = image.clone();
    let (width, height) = out.dimensions();
    for &(x, y) in points {
        let marker = Rect::new(
            x.saturating_sub(MARKER_RADIUS),
            y.saturating_sub(MARKER_RADIUS),
            x.saturating_add(MARKER_RADIUS + 1),
            y.saturating_add(MARKER_RADIUS + 1),
        );
        fill(&mut out, marker.clip_to(width, height));
    }
    out
}

fn fill(image: &mut TextureImage, rect: Rect) {
    for y in rect.top..rect.bottom {
        for x in rect.left..rect.right {
            if let Some(px) = image.get_mut(x, y) {
                *px = PREVIEW_COLOR;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: [u8; 4] = [128, 128, 128, 255];

    #[test]
    fn test_outline_is_two_pixels_wide() {
        let img = TextureImage::new(10, 10, GRAY);
        let out = draw_region_preview(&img, &[Rect::new(0, 0, 10, 10)]);
        assert_eq!(out.get(0, 5), Some(PREVIEW_COLOR));
        assert_eq!(out.get(1, 5), Some(PREVIEW_COLOR));
        assert_eq!(out.get(2, 5), Some(GRAY));
        assert_eq!(out.get(9, 9), Some(PREVIEW_COLOR));
        assert_eq!(out.get(8, 4), Some(PREVIEW_COLOR));
        assert_eq!(out.get(5, 5), Some(GRAY));
    }

    #[test]
    fn test_outline_clips_to_image() {
        let img = TextureImage::new(4, 4, GRAY);
        let out = draw_region_preview(&img, &[Rect::new(2, 2, 40, 40)]);
        assert_eq!(out.get(3, 3), Some(PREVIEW_COLOR));
        assert_eq!(out.get(1, 1), Some(GRAY));
        assert_eq!(img.get(3, 3), Some(GRAY));
    }

    #[test]
    fn test_anchor_markers_are_three_by_three() {
        let img = TextureImage::new(8, 8, GRAY);
        let out = draw_anchor_preview(&img, &[(4, 4), (0, 0)]);
        let red = out.pixels.iter().filter(|px| **px == PREVIEW_COLOR).count();
        assert_eq!(red, 9 + 4);
        assert_eq!(out.get(3, 5), Some(PREVIEW_COLOR));
        assert_eq!(out.get(6, 4), Some(GRAY));
    }
}
