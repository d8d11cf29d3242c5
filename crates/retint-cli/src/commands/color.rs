//! Color command: run one color through the pipeline.

use anyhow::{Context, Result};
use retint_core::{TransformParameters, transform};
use tracing::debug;

use crate::ColorArgs;

pub fn run(args: ColorArgs) -> Result<()> {
    let params = TransformParameters::from_slice(&args.params).context("Invalid parameter list")?;
    params.validate()?;
    debug!("params: {params}");

    let out = transform(args.color, &params);
    println!("{} -> {}", args.color, out);
    Ok(())
}
