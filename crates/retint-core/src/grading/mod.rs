//! Individual pipeline stages: RGB mask, hue shift, saturation and brightness.

pub mod enhance;
pub mod hue;
pub mod mask;

pub use enhance::{apply_brightness, apply_saturation, luma};
pub use hue::apply_hue_shift;
pub use mask::apply_mask;
