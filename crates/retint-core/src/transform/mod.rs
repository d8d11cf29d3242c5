//! Transform pipeline: parameter definitions and per-color evaluation.

pub mod evaluate;
pub mod params;
