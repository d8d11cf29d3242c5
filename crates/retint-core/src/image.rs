//! Image representation for the recoloring pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Result, RetintError};

/// Axis-aligned pixel rectangle, half-open on the right and bottom edges.
///
/// Serialized as `[left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    /// Excluded.
    pub right: u32,
    /// Excluded.
    pub bottom: u32,
}

impl Rect {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub const fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Rejects inverted rectangles. Empty ones are allowed.
    pub fn validate(&self) -> Result<()> {
        if self.right < self.left || self.bottom < self.top {
            return Err(RetintError::InvalidRect((*self).into()));
        }
        Ok(())
    }

    /// Intersect with a `width` x `height` image.
    pub fn clip_to(&self, width: u32, height: u32) -> Self {
        let right = self.right.min(width);
        let bottom = self.bottom.min(height);
        Self {
            left: self.left.min(right),
            top: self.top.min(bottom),
            right,
            bottom,
        }
    }

    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right <= width && self.bottom <= height
    }
}

impl From<[u32; 4]> for Rect {
    fn from([left, top, right, bottom]: [u32; 4]) -> Self {
        Self::new(left, top, right, bottom)
    }
}

impl From<Rect> for [u32; 4] {
    fn from(r: Rect) -> Self {
        [r.left, r.top, r.right, r.bottom]
    }
}

/// Contiguous RGBA8 pixel buffer, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data, `width * height` entries.
    pub pixels: Vec<[u8; 4]>,
}

impl TextureImage {
    /// A `width` x `height` image filled with `fill`.
    pub fn new(width: u32, height: u32, fill: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Flat index of `(x, y)`, or `None` when out of bounds.
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8; 4]> {
        self.index(x, y).map(|i| &mut self.pixels[i])
    }

    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        self.get(x, y).map(Color::from_rgba)
    }

    /// Row `y` as a slice.
    pub fn row(&self, y: u32) -> &[[u8; 4]] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    /// Fails unless `rect` lies fully inside the image.
    pub fn check_rect(&self, rect: &Rect) -> Result<()> {
        rect.validate()?;
        if !rect.fits_within(self.width, self.height) {
            return Err(RetintError::RectOutOfBounds {
                rect: (*rect).into(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Decode any format the `image` crate understands and convert to RGBA8.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|source| RetintError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from(img.to_rgba8()))
    }

    /// Encode to `path`; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_rgba_image()?.save(path)?;
        Ok(())
    }

    pub fn to_rgba_image(&self) -> Result<image::RgbaImage> {
        let raw: Vec<u8> = self.pixels.iter().flatten().copied().collect();
        image::RgbaImage::from_raw(self.width, self.height, raw).ok_or(
            RetintError::DimensionMismatch {
                left: (self.width, self.height),
                right: (self.pixels.len() as u32, 1),
            },
        )
    }
}

impl From<image::RgbaImage> for TextureImage {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img
            .into_raw()
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }
}
