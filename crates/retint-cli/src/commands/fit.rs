//! Fit command: sample anchors from an image pair and recover parameters.

use anyhow::{Context, Result};
use retint_core::fit::{FitStrategy, ParameterFitter, SearchSpace};
use retint_core::region::draw_anchor_preview;
use retint_core::{
    ParameterSet, Rect, TRANSPARENCY_TOLERANCE, TransformParameters, apply_params_to_rects,
    sample_grid, sample_points,
};
use tracing::{debug, info};

use super::{load_image, save_image};
use crate::{FitArgs, SetArg, StrategyArg};

pub fn run(args: FitArgs) -> Result<()> {
    let original = load_image(&args.original)?;
    let desired = load_image(&args.desired)?;
    let (width, height) = original.dimensions();
    let rect = args.rect.unwrap_or(Rect::new(0, 0, width, height));

    let sampling = if args.points.is_empty() {
        sample_grid(&original, &desired, rect, args.spacing, TRANSPARENCY_TOLERANCE)
    } else {
        sample_points(&original, &desired, &args.points, TRANSPARENCY_TOLERANCE)
    }
    .context("Failed to sample anchor colors")?;
    debug!(anchors = sampling.anchors.len(), "sampling done");

    if let Some(path) = &args.anchor_preview {
        save_image(path, &draw_anchor_preview(&original, &sampling.points))?;
        info!("anchor preview written to {}", path.display());
    }

    let set = match args.set {
        SetArg::Hsl => ParameterSet::hsl(),
        SetArg::Full6 => ParameterSet::full6(),
        SetArg::Full7 => ParameterSet::full7(),
    };
    let strategy = build_strategy(&args, set.dimensions());
    let mut space = SearchSpace::new(set);
    if !args.base.is_empty() {
        let base = TransformParameters::from_slice(&args.base).context("Invalid --base values")?;
        space = space.with_base(base);
    }

    let mut result = strategy
        .fit(&sampling.anchors, &space)
        .context("Parameter fitting failed")?;
    if args.strict {
        result = result.into_result()?;
    }

    if let Some(path) = &args.output {
        let recolored = apply_params_to_rects(&original, &result.params, &[rect], TRANSPARENCY_TOLERANCE);
        save_image(path, &recolored)?;
        info!("recolored image written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Strategy:    {}", strategy.name());
        println!("Anchors:     {}", sampling.anchors.len());
        for param in space.set.params() {
            println!("  {:<22} {:>10.4}", param.label(), result.params.get(*param));
        }
        println!("Parameters:  {}", result.params);
        println!("RMSE:        {:.4}", result.error);
        println!("Evaluations: {}", result.evaluations);
        if !result.success {
            println!("Warning:     {}", result.message);
        }
    }
    Ok(())
}

fn build_strategy(args: &FitArgs, dimensions: usize) -> FitStrategy {
    let mut strategy = match args.strategy {
        StrategyArg::Auto => FitStrategy::for_dimensions(dimensions),
        StrategyArg::Grid => FitStrategy::Grid(Default::default()),
        StrategyArg::Evolution => FitStrategy::Evolution(Default::default()),
    };
    match &mut strategy {
        FitStrategy::Grid(grid) => {
            if let Some(step) = args.step {
                grid.steps = vec![step];
            }
        }
        FitStrategy::Evolution(de) => {
            if let Some(n) = args.max_generations {
                de.max_generations = n;
            }
            if let Some(n) = args.population {
                de.population_size = n;
            }
            de.seed = args.seed;
            de.polish = !args.no_polish;
        }
    }
    strategy
}
