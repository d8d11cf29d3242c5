//! retint: fit and apply texture recolors from the command line.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "retint")]
#[command(author, version, about = "Fit and apply HSL-style recolors to game textures")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit transform parameters from an original/desired image pair
    #[command(visible_alias = "f")]
    Fit(FitArgs),

    /// Apply a region configuration to a batch of textures
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Transform a single color
    #[command(visible_alias = "c")]
    Color(ColorArgs),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SetArg {
    /// Hue, saturation, lightness
    Hsl,
    /// RGB mask plus hue, saturation, lightness
    Full6,
    /// Full6 plus secondary lightness
    Full7,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Grid up to three parameters, evolution above
    Auto,
    Grid,
    Evolution,
}

#[derive(Args)]
struct FitArgs {
    /// Original (decolored) image
    #[arg(long)]
    original: PathBuf,

    /// Desired (reference) image, same size as the original
    #[arg(long)]
    desired: PathBuf,

    /// Sampling rectangle as L,T,R,B
    #[arg(long, value_parser = commands::parse_rect)]
    rect: Option<retint_core::Rect>,

    /// Grid spacing in pixels inside the rectangle
    #[arg(long, default_value_t = retint_core::anchors::DEFAULT_GRID_SPACING)]
    spacing: u32,

    /// Explicit sample point as X,Y (repeatable)
    #[arg(long = "point", value_parser = commands::parse_point)]
    points: Vec<(u32, u32)>,

    /// Free parameters
    #[arg(long, value_enum, default_value = "hsl")]
    set: SetArg,

    /// Fixed values for parameters outside --set (dh,ds,dl or 6/7 values)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    base: Vec<f64>,

    /// Search strategy
    #[arg(long, value_enum, default_value = "auto")]
    strategy: StrategyArg,

    /// Grid step for every axis
    #[arg(long)]
    step: Option<f64>,

    /// Differential evolution generation limit
    #[arg(long)]
    max_generations: Option<usize>,

    /// Differential evolution members per parameter
    #[arg(long)]
    population: Option<usize>,

    /// Seed for reproducible evolution runs
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the polishing pass after evolution
    #[arg(long)]
    no_polish: bool,

    /// Fail when evolution stops without converging
    #[arg(long)]
    strict: bool,

    /// Write the original recolored with the fitted parameters
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the original with sampled anchors marked
    #[arg(long)]
    anchor_preview: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ApplyArgs {
    /// Region configuration (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Only process these texture ids (repeatable)
    #[arg(short, long = "texture")]
    textures: Vec<String>,

    /// Directory the file patterns are resolved against
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Input file name, `{id}` is replaced by the texture id
    #[arg(long, default_value = "texture_{id}_decolored.png")]
    input_pattern: String,

    /// Output file name
    #[arg(long, default_value = "texture_{id}_transformed.png")]
    output_pattern: String,

    /// Region outline preview file name
    #[arg(long, default_value = "texture_{id}_regions_preview.png")]
    preview_pattern: String,

    /// Do not write region previews
    #[arg(long)]
    no_preview: bool,
}

#[derive(Args)]
struct ColorArgs {
    /// Input color as R,G,B
    #[arg(value_parser = commands::parse_color)]
    color: retint_core::Color,

    /// Parameters: dh,ds,dl or dr,dg,db,dh,ds,dl[,final_dl]
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    params: Vec<f64>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Fit(args) => commands::fit::run(args),
        Commands::Apply(args) => commands::apply::run(args),
        Commands::Color(args) => commands::color::run(args),
    }
}
