//! Error type shared by every retint operation.

use std::path::PathBuf;

/// Errors produced while fitting, transforming, or applying recolors.
///
/// Every failure is local to one invocation so a batch over several textures
/// can log the error and move on to the next one.
#[derive(Debug, thiserror::Error)]
pub enum RetintError {
    #[error("no anchor samples were collected")]
    EmptySampleSet,
    #[error("optimization failed: {message}")]
    OptimizationFailure { message: String },
    #[error("parameter `{name}` = {value} is outside [{min}, {max}]")]
    OutOfDomainParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("expected 3, 6 or 7 parameters, got {0}")]
    ParameterCount(usize),
    #[error("{expected} bounds required, got {actual}")]
    BoundsMismatch { expected: usize, actual: usize },
    #[error("bounds for `{name}` are inverted: min {min} > max {max}")]
    InvalidBounds {
        name: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{strategy} search supports at most {max} parameters, got {actual}")]
    TooManyDimensions {
        strategy: &'static str,
        max: usize,
        actual: usize,
    },
    #[error("grid of {points} points exceeds the limit of {limit}")]
    SearchSpaceTooLarge { points: u64, limit: u64 },
    #[error("invalid grid step {step} for parameter `{name}`")]
    InvalidStep { name: &'static str, step: f64 },
    #[error("original has {original} samples but desired has {desired}")]
    SampleLengthMismatch { original: usize, desired: usize },
    #[error("image sizes differ: {left:?} vs {right:?}")]
    DimensionMismatch { left: (u32, u32), right: (u32, u32) },
    #[error("rectangle {rect:?} lies outside a {width}x{height} image")]
    RectOutOfBounds {
        rect: [u32; 4],
        width: u32,
        height: u32,
    },
    #[error("rectangle {0:?} has right < left or bottom < top")]
    InvalidRect([u32; 4]),
    #[error("sampling spacing must be at least 1")]
    InvalidSpacing,
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image error: {0}")]
    Codec(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RetintError>;
