//! Regional application of transform parameters.

pub mod apply;
pub mod config;
pub mod preview;

pub use apply::{RegionReport, apply_params_to_rects, apply_regions};
pub use config::{Region, RegionConfig, TextureRegions};
pub use preview::{draw_anchor_preview, draw_region_preview};
