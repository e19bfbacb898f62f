use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use polyfit::{
    engine::Engine,
    files::{load_genome, load_target},
    settings::{
        EngineConfig, DEFAULT_POLYGON_COUNT, DEFAULT_SAVE_EVERY, DEFAULT_VERTEX_COUNT,
        MAX_IMAGE_HEIGHT, MIN_POLYGON_COUNT, MIN_VERTEX_COUNT, TILE_SIZE,
    },
    snapshot::{run, SaveTrigger, SnapshotSaver},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SaveOn {
    Iterations,
    Improvements,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Approximate an image with translucent polygons", long_about = None)]
struct Args {
    /// Target image
    image: PathBuf,

    /// Resume from a saved genome (.dna text or .json)
    #[arg(long)]
    genome: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_POLYGON_COUNT)]
    polygons: usize,

    #[arg(long, default_value_t = DEFAULT_VERTEX_COUNT)]
    vertices: usize,

    /// Snapshot interval, counted in `--save-on` units
    #[arg(long, default_value_t = DEFAULT_SAVE_EVERY)]
    save_every: u64,

    #[arg(long, value_enum, default_value_t = SaveOn::Improvements)]
    save_on: SaveOn,

    /// Snapshot path prefix, defaults to the image path without extension
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many iterations, runs until Ctrl-C otherwise
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Longest side of the working image
    #[arg(long, default_value_t = MAX_IMAGE_HEIGHT)]
    max_size: usize,

    #[arg(long, default_value_t = TILE_SIZE)]
    tile_size: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    ensure!(args.polygons >= MIN_POLYGON_COUNT, "need at least {MIN_POLYGON_COUNT} polygon");
    ensure!(args.vertices >= MIN_VERTEX_COUNT, "need at least {MIN_VERTEX_COUNT} vertices");
    ensure!(args.tile_size > 0, "tile size must be positive");
    ensure!(args.max_size > 0, "max size must be positive");

    let target = load_target(&args.image, args.max_size, args.max_size)?;
    let config = EngineConfig {
        tile_size: args.tile_size,
        seed: args.seed,
        ..Default::default()
    };
    let mut engine = match &args.genome {
        Some(path) => {
            let genome = load_genome(path)?;
            info!(path = %path.display(), polygons = genome.polygon_count, "resuming from genome");
            Engine::from_genome(target, &genome, config)
        }
        None => Engine::new(target, args.polygons, args.vertices, config),
    };

    let stem = args.output.unwrap_or_else(|| args.image.with_extension(""));
    let trigger = match args.save_on {
        SaveOn::Iterations => SaveTrigger::Iterations(args.save_every),
        SaveOn::Improvements => SaveTrigger::Improvements(args.save_every),
    };
    let mut saver = SnapshotSaver::new(&stem, trigger);

    let interrupted = Arc::new(AtomicBool::new(false));
    setup_interrupt_handler(interrupted.clone())?;

    run(&mut engine, &mut saver, args.max_iterations, &interrupted)?;
    Ok(())
}

/// First Ctrl-C stops the loop after the current iteration, a second one exits.
fn setup_interrupt_handler(interrupted: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        if interrupted.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
    })?;
    Ok(())
}
