//! Region configuration: texture id → region name → parameters + rectangles.
//!
//! ```json
//! {
//!   "102001": {
//!     "Hair": { "params": [4.44, -249.69, -236.83, -2.96, -92.78, 30.42, -5.0],
//!               "rects": [[0, 0, 815, 800], [815, 0, 1041, 650]] },
//!     "Eyes": { "params": { "dh": 3.1, "ds": -89.4 }, "rects": [[1047, 461, 1089, 506]] }
//!   }
//! }
//! ```
//!
//! Regions are applied in file order.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::image::Rect;
use crate::transform::params::TransformParameters;

/// One named region: a parameter set applied over a list of rectangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub params: TransformParameters,
    pub rects: Vec<Rect>,
}

/// Regions for one texture, in application order.
pub type TextureRegions = IndexMap<String, Region>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionConfig {
    pub textures: IndexMap<String, TextureRegions>,
}

impl RegionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(
            "loaded {} texture(s) from {}",
            config.textures.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every parameter in domain and every rectangle non-inverted.
    pub fn validate(&self) -> Result<()> {
        for region in self.textures.values().flat_map(IndexMap::values) {
            region.params.validate()?;
            for rect in &region.rects {
                rect.validate()?;
            }
        }
        Ok(())
    }

    pub fn texture(&self, id: &str) -> Option<&TextureRegions> {
        self.textures.get(id)
    }

    pub fn texture_ids(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }
}
