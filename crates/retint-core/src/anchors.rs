//! Anchor samples: paired original/desired colors taken at the same pixels.
//!
//! Sampling walks either a regular grid inside a rectangle or an explicit
//! list of coordinates. Points whose ORIGINAL pixel is transparent are
//! skipped; the desired image's alpha is not consulted.

use crate::color::{Color, is_transparent};
use crate::error::{Result, RetintError};
use crate::image::{Rect, TextureImage};

/// Default grid spacing in pixels.
pub const DEFAULT_GRID_SPACING: u32 = 30;

/// Parallel sequences of original and desired colors, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorSet {
    original: Vec<Color>,
    desired: Vec<Color>,
}

impl AnchorSet {
    pub fn new(original: Vec<Color>, desired: Vec<Color>) -> Result<Self> {
        if original.len() != desired.len() {
            return Err(RetintError::SampleLengthMismatch {
                original: original.len(),
                desired: desired.len(),
            });
        }
        Ok(Self { original, desired })
    }

    /// A set with one pair.
    pub fn single(original: Color, desired: Color) -> Self {
        Self {
            original: vec![original],
            desired: vec![desired],
        }
    }

    pub fn push(&mut self, original: Color, desired: Color) {
        self.original.push(original);
        self.desired.push(desired);
    }

    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    pub fn original(&self) -> &[Color] {
        &self.original
    }

    pub fn desired(&self) -> &[Color] {
        &self.desired
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, Color)> + '_ {
        self.original.iter().copied().zip(self.desired.iter().copied())
    }
}

/// Sampled anchors plus the coordinates they came from.
#[derive(Debug, Clone, Default)]
pub struct AnchorSampling {
    pub anchors: AnchorSet,
    pub points: Vec<(u32, u32)>,
}

/// Sample every `spacing`-th pixel of `rect`, column by column.
///
/// Returns an empty set rather than an error when every point is
/// transparent; the fitter reports [`RetintError::EmptySampleSet`].
pub fn sample_grid(
    original: &TextureImage,
    desired: &TextureImage,
    rect: Rect,
    spacing: u32,
    tolerance: u8,
) -> Result<AnchorSampling> {
    if spacing == 0 {
        return Err(RetintError::InvalidSpacing);
    }
    check_pair(original, desired)?;
    original.check_rect(&rect)?;

    let step = spacing as usize;
    let points: Vec<(u32, u32)> = (rect.left..rect.right)
        .step_by(step)
        .flat_map(|x| (rect.top..rect.bottom).step_by(step).map(move |y| (x, y)))
        .collect();

    let sampling = collect(original, desired, &points, tolerance);
    tracing::info!(
        "sampled {} anchor points from {:?} with a {}px grid",
        sampling.anchors.len(),
        <[u32; 4]>::from(rect),
        spacing
    );
    Ok(sampling)
}

/// Sample explicit coordinates, e.g. a single designated pixel.
pub fn sample_points(
    original: &TextureImage,
    desired: &TextureImage,
    points: &[(u32, u32)],
    tolerance: u8,
) -> Result<AnchorSampling> {
    check_pair(original, desired)?;
    if let Some(&(x, y)) = points
        .iter()
        .find(|&&(x, y)| original.index(x, y).is_none())
    {
        return Err(RetintError::RectOutOfBounds {
            rect: [x, y, x.saturating_add(1), y.saturating_add(1)],
            width: original.width,
            height: original.height,
        });
    }
    Ok(collect(original, desired, points, tolerance))
}

fn check_pair(original: &TextureImage, desired: &TextureImage) -> Result<()> {
    if original.dimensions() != desired.dimensions() {
        return Err(RetintError::DimensionMismatch {
            left: original.dimensions(),
            right: desired.dimensions(),
        });
    }
    Ok(())
}

// Callers have already bounds-checked every point.
fn collect(
    original: &TextureImage,
    desired: &TextureImage,
    points: &[(u32, u32)],
    tolerance: u8,
) -> AnchorSampling {
    let mut out = AnchorSampling::default();
    for &(x, y) in points {
        let (Some(src), Some(dst)) = (original.get(x, y), desired.get(x, y)) else {
            continue;
        };
        if is_transparent(src, tolerance) {
            continue;
        }
        out.anchors.push(Color::from_rgba(src), Color::from_rgba(dst));
        out.points.push((x, y));
    }
    out
}
