//! One rank's lifecycle: allocate, seed, run, report.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use halo_arena::WorldState;
use halo_comm::Transport;
use halo_core::{Cell, RankId, StreamIndex, WorldSnapshot};
use halo_rng::RandomStreams;

use crate::config::{ConfigError, SimConfig};
use crate::coordinator::BandCoordinator;
use crate::error::RunError;
use crate::metrics::RankMetrics;
use crate::policy::RowStreamPolicy;
use crate::rule::CellRule;

/// How the initial generation is produced.
#[derive(Clone, Debug, Default)]
pub enum Seeding {
    /// Every cell is `ALIVE` iff a draw from the stream of its global row
    /// is `>= 0.5`. Identical for every decomposition.
    #[default]
    Random,
    /// A fixed global pattern; each rank loads its own band.
    Explicit(Arc<WorldSnapshot>),
}

/// What one rank hands back after a successful run.
#[derive(Clone, Debug)]
pub struct RankOutcome {
    /// The rank.
    pub rank: RankId,
    /// Final generation of the rank's owned rows, top to bottom.
    pub band: Vec<Vec<Cell>>,
    /// Coordinator-thread timing.
    pub metrics: RankMetrics,
    /// Wall-clock time between the start and end cluster barriers.
    pub elapsed: Duration,
}

/// Run the rank `transport.rank()` of a `transport.size()`-rank cluster.
///
/// Every rank of the cluster must call this with the same `config` and
/// `seeding`. On failure the cluster is aborted so the other ranks stop
/// too.
///
/// # Errors
///
/// Any [`RunError`]; the config must already have passed
/// [`SimConfig::validate`] for `transport.size()` ranks, otherwise a
/// [`RunError::Config`] is returned here.
pub fn run_rank<T>(
    config: &SimConfig,
    seeding: &Seeding,
    streams: &dyn RandomStreams,
    policy: &dyn RowStreamPolicy,
    transport: &T,
) -> Result<RankOutcome, RunError>
where
    T: Transport + ?Sized,
{
    let result = run(config, seeding, streams, policy, transport);
    if let Err(e) = &result {
        if !e.is_secondary() {
            log::error!("rank {} failed: {e}", transport.rank());
        }
        transport.abort();
    }
    result
}

fn run<T>(
    config: &SimConfig,
    seeding: &Seeding,
    streams: &dyn RandomStreams,
    policy: &dyn RowStreamPolicy,
    transport: &T,
) -> Result<RankOutcome, RunError>
where
    T: Transport + ?Sized,
{
    let rank = transport.rank();
    let layout = config.layout(transport.size(), rank)?;
    let bands = config.thread_bands(&layout)?;
    if streams.stream_count() < layout.height() {
        return Err(ConfigError::StreamsExhausted {
            required: layout.height(),
            available: streams.stream_count(),
        }
        .into());
    }
    debug!(
        "rank {rank}: global rows {:?}, {} threads of {} rows",
        layout.global_rows(),
        bands.threads(),
        bands.band_len()
    );

    let world = WorldState::new(layout)?;
    let layout = world.layout();
    match seeding {
        Seeding::Random => world.fill_next(|r, _| {
            Cell::from_coin(streams.draw(StreamIndex(layout.global_row(r))))
        }),
        Seeding::Explicit(pattern) => {
            let actual = (pattern.height(), pattern.width());
            let expected = (layout.height(), layout.width());
            if actual != expected {
                return Err(ConfigError::PatternShape { expected, actual }.into());
            }
            world.load_next(pattern);
        }
    }

    let coordinator =
        BandCoordinator::new(&world, &bands, CellRule::from_config(config), streams, policy);
    transport.barrier()?;
    let started = Instant::now();
    let metrics = coordinator.run(transport, config.ticks)?;
    transport.barrier()?;
    let elapsed = started.elapsed();
    debug!(
        "rank {rank}: {} ticks in {elapsed:?} (exchange {}us, compute {}us)",
        metrics.ticks, metrics.exchange_us, metrics.compute_us
    );

    Ok(RankOutcome {
        rank,
        band: world.band_rows(),
        metrics,
        elapsed,
    })
}
