//! Retint Core: color-transform fitting and regional texture recoloring.
//!
//! This crate contains the fixed five-stage color pipeline, the parameter
//! fitters that recover pipeline parameters from anchor color pairs, anchor
//! sampling, and region application. No CLI dependencies.

pub mod anchors;
pub mod color;
pub mod error;
pub mod fit;
pub mod grading;
pub mod image;
pub mod region;
pub mod transform;

// Re-exports for convenience.
pub use crate::anchors::{AnchorSampling, AnchorSet, sample_grid, sample_points};
pub use crate::color::{Color, TRANSPARENCY_TOLERANCE};
pub use crate::error::{Result, RetintError};
pub use crate::fit::{
    DifferentialEvolution, FitResult, FitStrategy, GridSearch, ParameterFitter, SearchSpace,
};
pub use crate::image::{Rect, TextureImage};
pub use crate::region::{Region, RegionConfig, apply_params_to_rects, apply_regions};
pub use crate::transform::evaluate::{transform, transform_pixel};
pub use crate::transform::params::{Param, ParameterSet, TransformParameters};
