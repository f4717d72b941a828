#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chunk_life::chunklife::{LifeConfig, LifeSession, SpeedLevel};
use clap::Parser;
use rand::SeedableRng;
use tracing::info;

const DEFAULT_SEED: u64 = 0x5EED_1234_ABCD_EF01;

/// Headless driver: load or seed a world, run generations, save the result.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generations to precompute before anything else (1-1000)
    #[arg(short = 'z', long)]
    rounds: Option<u64>,

    /// Playback speed level (1-10), stored in saved patterns
    #[arg(short, long)]
    speed: Option<i64>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Life 1.06 pattern to start from
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Write the final world to this pattern file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Generations to run after precompute
    #[arg(short, long, default_value_t = 0)]
    generations: u64,

    /// Random fill of a rectangle at density 1/3
    #[arg(
        long,
        num_args = 4,
        value_names = ["X", "Y", "W", "H"],
        allow_negative_numbers = true
    )]
    random: Option<Vec<i64>>,

    /// Seed for --random
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn build_config(args: &Args) -> Result<LifeConfig> {
    let mut config = match &args.config {
        Some(path) => LifeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LifeConfig::default(),
    };
    if let Some(rounds) = args.rounds {
        config = config.precompute_rounds(rounds);
    }
    if let Some(speed) = args.speed {
        config = config.speed(SpeedLevel::new(speed)?);
    }
    config.validate()?;
    Ok(config)
}

fn seed_random(session: &mut LifeSession, rect: &[i64], seed: u64) -> Result<()> {
    let &[x, y, w, h] = rect else {
        bail!("--random expects X Y W H");
    };
    let width = u32::try_from(w).context("--random width must fit in u32")?;
    let height = u32::try_from(h).context("--random height must fit in u32")?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    session.randomize(x, y, width, height, &mut rng)?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chunk_life=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let mut session = LifeSession::new(config)?;

    if let Some(path) = &args.load {
        session
            .load(path)
            .with_context(|| format!("loading pattern {}", path.display()))?;
    }
    if let Some(rect) = &args.random {
        seed_random(&mut session, rect, args.seed)?;
    }

    let start = Instant::now();
    let precomputed = session.precompute()?;
    let mut births = 0usize;
    let mut deaths = 0usize;
    for _ in 0..args.generations {
        let stats = session.step()?;
        births += stats.births;
        deaths += stats.deaths;
    }
    let elapsed = start.elapsed();
    let ran = precomputed + args.generations;
    info!(generations = ran, elapsed_ms = elapsed.as_millis() as u64, "run finished");

    if let Some(path) = &args.save {
        session
            .save(path)
            .with_context(|| format!("saving pattern {}", path.display()))?;
    }

    let world = session.world();
    let total_ms = elapsed.as_secs_f64() * 1000.0;
    let avg_ms = if ran > 0 { total_ms / ran as f64 } else { 0.0 };
    println!("Generation {}: population = {}, chunks = {}", session.generation(), world.population(), world.chunk_count());
    println!("  {ran} generations in {total_ms:.3} ms, {avg_ms:.6} ms/gen (births {births}, deaths {deaths} after precompute)");
    match world.bounds() {
        Some((min_x, min_y, max_x, max_y)) => {
            println!("  bounds: ({min_x}, {min_y}) .. ({max_x}, {max_y})");
        }
        None => println!("  world is empty"),
    }
    Ok(())
}
