//! Pac-Man agent evaluation CLI
//!
//! Run a batch of headless trials for one agent and report its performance.

use clap::Parser;
use pacman_core::AgentKind;
use pacman_sim::{BatchExport, BatchRunner, MazeLayout, SimError, TrialConfig};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Pac-Man agent evaluation harness
#[derive(Parser, Debug)]
#[command(name = "pacman-sim")]
#[command(about = "Run headless Pac-Man trials and summarize agent performance", long_about = None)]
struct Args {
    /// Agent to evaluate (idle, random, greedy)
    #[arg(short, long, default_value = "greedy")]
    agent: AgentKind,

    /// Number of trials
    #[arg(short = 'n', long, default_value = "100")]
    trials: usize,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Base seed; trial i uses seed + i (0 = random from time)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Game-time multiplier (0.1 to 5.0)
    #[arg(long)]
    speed: Option<f64>,

    /// Starting lives
    #[arg(long)]
    lives: Option<u32>,

    /// Starting level
    #[arg(long)]
    level: Option<u32>,

    /// Tick cap per trial (0 = unlimited)
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Levels to clear for a win (0 = play until out of lives)
    #[arg(long)]
    levels_to_win: Option<u32>,

    /// Disable adversaries
    #[arg(long)]
    no_ghosts: bool,

    /// Power pellets do not frighten adversaries
    #[arg(long)]
    no_freight: bool,

    /// Pace ticks in real time and scale game time by --speed
    #[arg(long)]
    realtime: bool,

    /// Log ASCII frames (needs --verbose to be seen)
    #[arg(long)]
    visuals: bool,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Maze layout file (defaults to the built-in maze)
    #[arg(long)]
    layout: Option<String>,

    /// Log every finished trial
    #[arg(long)]
    progress: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export the summary and every trial record to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn build_config(args: &Args) -> Result<TrialConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => TrialConfig::from_file(path)?,
        None => TrialConfig::headless(),
    };

    if let Some(seed) = args.seed {
        config.seed = if seed == 0 {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        } else {
            seed
        };
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if let Some(lives) = args.lives {
        config.start_lives = lives;
    }
    if let Some(level) = args.level {
        config.start_level = level;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }
    if let Some(levels) = args.levels_to_win {
        config.levels_to_win = levels;
    }
    if args.no_ghosts {
        config.ghosts_enabled = false;
    }
    if args.no_freight {
        config.freight_enabled = false;
    }
    if args.realtime {
        config.lock_delta_time = false;
    }
    if args.visuals {
        config.disable_visuals = false;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = build_config(args)?;
    let layout = match &args.layout {
        Some(path) => MazeLayout::from_file(path)?,
        None => MazeLayout::classic(),
    };

    let runner = BatchRunner::new(config.clone(), args.trials)?
        .with_threads(args.threads)
        .with_progress(args.progress)
        .with_layout(Arc::new(layout));

    let kind = args.agent;
    let results = runner.run_records(&|seed| kind.build(seed))?;
    let export = BatchExport::from_results(kind.name(), &config, results);

    if args.json {
        let summary = serde_json::json!({
            "agent": export.agent,
            "seed": config.seed,
            "summary": export.summary,
            "aborted": export.aborted,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!("Agent '{}' (base seed {})", export.agent, config.seed);
        for line in export.summary.to_string().lines() {
            info!("{}", line);
        }
        for aborted in &export.aborted {
            error!("  - seed={}: {}", aborted.seed, aborted.reason);
        }
    }

    if let Some(path) = &args.export {
        export.write_to_file(path)?;
        info!("Exported {} records to {}", export.records.len(), path);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !args.json {
        info!("Pac-Man Agent Harness v0.1.0");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
