//! lizards — run the driveway crossing world from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Silent 30-second run; exit status 0, or 255 if a cat pounced
//! lizards
//!
//! # Trace every lizard and cat step
//! lizards -d
//!
//! # No direction arbitration, crashes detected, 10x faster clock
//! lizards -d --bidirectional --detect-conflicts --time-unit-ms 100
//! ```

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lz_core::{CrossingConfig, CrossingPolicy};
use lz_sim::{SimBuilder, SimOutcome};

/// Lizards crossing a driveway watched by cats
#[derive(Parser, Debug)]
#[command(name = "lizards")]
#[command(about = "Lizard crossing simulation: a capacity gate and a direction arbiter under watch")]
#[command(version)]
struct Args {
    /// Trace every lifecycle step (RUST_LOG overrides the level)
    #[arg(short, long)]
    debug: bool,

    /// Let both directions share the driveway
    #[arg(long)]
    bidirectional: bool,

    /// Treat oncoming traffic as a crash even when bidirectional
    #[arg(long)]
    detect_conflicts: bool,

    /// Number of lizards
    #[arg(long, default_value_t = 20)]
    lizards: usize,

    /// Number of cats
    #[arg(long, default_value_t = 2)]
    cats: usize,

    /// Simulated seconds before the world ends
    #[arg(long, default_value_t = 30)]
    world_end: u64,

    /// Lizards allowed on the driveway at once
    #[arg(long, default_value_t = 4)]
    capacity: usize,

    /// Cats pounce when they see more than this many lizards crossing
    #[arg(long, default_value_t = 4)]
    max_crossing: usize,

    /// Simulated seconds one crossing takes
    #[arg(long, default_value_t = 2)]
    cross_secs: u64,

    /// RNG seed (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Wall-clock milliseconds per simulated second
    #[arg(long, default_value_t = 1_000)]
    time_unit_ms: u64,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> CrossingConfig {
        CrossingConfig {
            lizards:             self.lizards,
            cats:                self.cats,
            world_end_secs:      self.world_end,
            capacity:            self.capacity,
            max_lizard_crossing: self.max_crossing,
            cross_secs:          self.cross_secs,
            policy:              if self.bidirectional {
                CrossingPolicy::Bidirectional
            } else {
                CrossingPolicy::Unidirectional
            },
            detect_conflicts:    self.detect_conflicts,
            trace:               self.debug,
            seed:                self.seed,
            time_unit:           Duration::from_millis(self.time_unit_ms),
            ..Default::default()
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let level = if args.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry().with(fmt::layer().with_thread_names(true)).with(filter).init();

    let sim = SimBuilder::new(args.config()).build()?;
    let report = sim.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if let SimOutcome::Aborted(violation) = &report.outcome {
        tracing::error!(
            %violation,
            crossings = report.total_crossings(),
            elapsed   = ?report.elapsed,
            "world aborted"
        );
    }

    Ok(ExitCode::from(report.outcome.exit_code()))
}
