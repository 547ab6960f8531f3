//! `halo` command-line driver.
//!
//! ```text
//! halo [--ranks N] [--seed S] [--streams K] [--stream-keying local|global]
//!      [--log-dir DIR] <THREADS> <WIDTH> <HEIGHT> <TICKS> <THRESHOLD>
//! ```
//!
//! Runs the simulation on an in-process cluster of `N` ranks, prints the
//! elapsed time and writes it to `DIR/log_<N>_<THREADS>`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use halo::engine::output::write_elapsed_log;
use halo::prelude::*;
use halo::rng::DEFAULT_STREAM_COUNT;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Keying {
    /// Stream keyed by the row offset within each rank's band.
    Local,
    /// Stream keyed by the global row.
    Global,
}

impl From<Keying> for StreamKeying {
    fn from(k: Keying) -> Self {
        match k {
            Keying::Local => StreamKeying::LocalOffset,
            Keying::Global => StreamKeying::GlobalRow,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "halo", version, about = "Stochastic life on a torus with halo exchange")]
struct Args {
    /// Worker threads per rank.
    threads: usize,
    /// Grid width in cells.
    width: usize,
    /// Grid height in cells.
    height: usize,
    /// Ticks to run.
    ticks: u64,
    /// Gating threshold in percent (0-100).
    threshold: u32,

    /// Number of ranks.
    #[arg(long, default_value_t = 1)]
    ranks: usize,
    /// Random stream seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Number of random streams.
    #[arg(long, default_value_t = DEFAULT_STREAM_COUNT)]
    streams: usize,
    /// Row-to-stream mapping.
    #[arg(long, value_enum, default_value_t = Keying::Local)]
    stream_keying: Keying,
    /// Directory for the elapsed-time log.
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

impl Args {
    fn config(&self) -> SimConfig {
        let mut config = SimConfig::new(
            self.threads,
            self.width,
            self.height,
            self.ticks,
            self.threshold,
        );
        config.seed = self.seed;
        config.stream_count = self.streams;
        config.stream_keying = self.stream_keying.into();
        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let simulation = Simulation::builder(args.config())
        .ranks(args.ranks)
        .build()
        .context("invalid configuration")?;
    info!("running {simulation:?}");
    let report = simulation.run().context("simulation failed")?;

    let path = write_elapsed_log(&args.log_dir, report.ranks, report.threads, report.elapsed)
        .with_context(|| format!("writing log to {}", args.log_dir.display()))?;
    info!("elapsed time written to {}", path.display());
    println!("{:.6}", report.elapsed.as_secs_f64());
    Ok(())
}
