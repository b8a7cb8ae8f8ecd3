use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use detectview::{Detector, Pipeline, ReplayDetector, Session, SessionConfig};

#[derive(Parser)]
#[command(name = "detectview")]
#[command(about = "Draw object detections onto a photo")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// JSON file with detections in normalized-image pixels
    #[arg(long, value_name = "FILE")]
    detections: Option<PathBuf>,

    /// Where to write the annotated image
    #[arg(short, long, value_name = "FILE", default_value = "annotated.png")]
    out: PathBuf,

    /// JSON session config
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the minimum side length used for downsampling
    #[arg(long, value_name = "PX")]
    target_size: Option<u32>,

    /// Ask the detector to use its accelerated backend
    #[arg(long)]
    gpu: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => SessionConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(target) = args.target_size {
        config.normalize.target_min_dimension = target;
    }

    let detector: Box<dyn Detector> = match &args.detections {
        Some(path) => Box::new(
            ReplayDetector::from_json_file(path)
                .with_context(|| format!("failed to load detections {}", path.display()))?,
        ),
        None => Box::new(ReplayDetector::unavailable()),
    };

    let session = Session::new(config, detector)?;
    let mut pipeline = Pipeline::new(session).with_verbose(args.verbose);
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    pipeline.run_file(&args.image_path, &args.out, args.gpu)?;
    println!("Annotated image written to {}", args.out.display());

    Ok(())
}
