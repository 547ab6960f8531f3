//! An in-process cluster of ranks: the top-level [`Simulation`].
//!
//! Each rank runs on its own named thread with a [`LocalEndpoint`] of a
//! shared [`LocalCluster`]. Ranks build their own random streams from a
//! factory, so any [`RandomStreams`] implementation can be plugged in.
//!
//! [`LocalEndpoint`]: halo_comm::LocalEndpoint

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::info;

use halo_comm::{LocalCluster, Transport};
use halo_core::{RankId, ResourceError, WorldSnapshot};
use halo_rng::{ChaChaStreams, RandomStreams};

use crate::config::{ConfigError, SimConfig};
use crate::error::RunError;
use crate::metrics::RankMetrics;
use crate::policy::RowStreamPolicy;
use crate::rank::{run_rank, RankOutcome, Seeding};

/// Builds the random streams of one rank.
///
/// Every rank must get streams that produce the same sequence for the
/// same index, or the decomposition leaks into the result.
pub type StreamFactory =
    dyn Fn(RankId, &SimConfig) -> Result<Box<dyn RandomStreams>, ResourceError> + Send + Sync;

fn chacha_streams(_: RankId, config: &SimConfig) -> Result<Box<dyn RandomStreams>, ResourceError> {
    Ok(Box::new(ChaChaStreams::with_count(
        config.seed,
        config.stream_count,
    )?))
}

/// Result of a successful [`Simulation::run`].
#[derive(Clone, Debug)]
pub struct RunReport {
    /// The final generation of the whole grid.
    pub snapshot: WorldSnapshot,
    /// Wall-clock time measured by rank 0 between the start and end
    /// cluster barriers.
    pub elapsed: Duration,
    /// Rank count.
    pub ranks: usize,
    /// Threads per rank.
    pub threads: usize,
    /// Ticks run.
    pub ticks: u64,
    /// Per-rank timing, indexed by rank.
    pub rank_metrics: Vec<RankMetrics>,
}

/// Builder for [`Simulation`].
pub struct SimulationBuilder {
    config: SimConfig,
    ranks: usize,
    seeding: Seeding,
    streams: Option<Arc<StreamFactory>>,
    policy: Option<Arc<dyn RowStreamPolicy>>,
}

impl SimulationBuilder {
    /// Number of ranks (default 1).
    pub fn ranks(mut self, ranks: usize) -> Self {
        self.ranks = ranks;
        self
    }

    /// Initial generation (default [`Seeding::Random`]).
    pub fn seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    /// Start from a fixed global pattern.
    pub fn pattern(self, pattern: WorldSnapshot) -> Self {
        self.seeding(Seeding::Explicit(Arc::new(pattern)))
    }

    /// Random stream factory (default: [`ChaChaStreams`] seeded with
    /// `config.seed`).
    pub fn streams<F>(mut self, factory: F) -> Self
    where
        F: Fn(RankId, &SimConfig) -> Result<Box<dyn RandomStreams>, ResourceError>
            + Send
            + Sync
            + 'static,
    {
        self.streams = Some(Arc::new(factory) as Arc<StreamFactory>);
        self
    }

    /// Row-to-stream policy (default: `config.stream_keying`).
    pub fn policy<P: RowStreamPolicy + 'static>(mut self, policy: P) -> Self {
        self.policy = Some(Arc::new(policy) as Arc<dyn RowStreamPolicy>);
        self
    }

    /// Validate the configuration for the chosen rank count.
    ///
    /// An explicit pattern's shape is checked here too.
    pub fn build(self) -> Result<Simulation, ConfigError> {
        self.config.validate(self.ranks)?;
        if let Seeding::Explicit(pattern) = &self.seeding {
            let actual = (pattern.height(), pattern.width());
            let expected = (self.config.height, self.config.width);
            if actual != expected {
                return Err(ConfigError::PatternShape { expected, actual });
            }
        }
        let keying = self.config.stream_keying;
        let policy = self
            .policy
            .unwrap_or_else(|| Arc::new(keying) as Arc<dyn RowStreamPolicy>);
        Ok(Simulation {
            config: self.config,
            ranks: self.ranks,
            seeding: self.seeding,
            streams: self
                .streams
                .unwrap_or_else(|| Arc::new(chacha_streams) as Arc<StreamFactory>),
            policy,
        })
    }
}

/// A validated simulation, ready to run on an in-process cluster.
///
/// # Examples
///
/// ```
/// use halo_engine::{SimConfig, Simulation};
///
/// let config = SimConfig::new(2, 8, 8, 10, 5);
/// let report = Simulation::builder(config).ranks(2).build()?.run()?;
/// assert_eq!(report.snapshot.height(), 8);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Simulation {
    config: SimConfig,
    ranks: usize,
    seeding: Seeding,
    streams: Arc<StreamFactory>,
    policy: Arc<dyn RowStreamPolicy>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("ranks", &self.ranks)
            .field("seeding", &self.seeding)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Start building a simulation of `config`.
    pub fn builder(config: SimConfig) -> SimulationBuilder {
        SimulationBuilder {
            config,
            ranks: 1,
            seeding: Seeding::default(),
            streams: None,
            policy: None,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Rank count.
    pub fn ranks(&self) -> usize {
        self.ranks
    }

    /// Run every rank to completion and gather the final grid.
    ///
    /// # Errors
    ///
    /// The root-cause [`RunError`] of the first failing rank. Errors that
    /// merely report the resulting abort are only returned when no rank
    /// reported anything better.
    pub fn run(&self) -> Result<RunReport, RunError> {
        let cluster = LocalCluster::new(self.ranks);
        let abort = cluster.abort_handle();
        let endpoints = cluster.into_endpoints();

        let results: Vec<Result<RankOutcome, RunError>> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.ranks);
            let mut results = Vec::new();
            for endpoint in endpoints {
                let rank = endpoint.rank();
                let spawned = thread::Builder::new()
                    .name(format!("halo-rank-{rank}"))
                    .spawn_scoped(scope, move || self.run_one(&endpoint));
                match spawned {
                    Ok(handle) => handles.push((rank, handle)),
                    Err(e) => {
                        abort.abort();
                        results.push(Err(RunError::Resource(ResourceError::ThreadSpawnFailed {
                            reason: e.to_string(),
                        })));
                        break;
                    }
                }
            }
            for (rank, handle) in handles {
                results.push(
                    handle
                        .join()
                        .unwrap_or(Err(RunError::RankPanicked { rank })),
                );
            }
            results
        });

        let mut outcomes = Vec::with_capacity(self.ranks);
        let mut first_error: Option<RunError> = None;
        for result in results {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => match &first_error {
                    Some(prev) if !prev.is_secondary() || e.is_secondary() => {}
                    _ => first_error = Some(e),
                },
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        outcomes.sort_by_key(|o| o.rank);
        let elapsed = outcomes.first().map(|o| o.elapsed).unwrap_or_default();
        let rank_metrics = outcomes.iter().map(|o| o.metrics.clone()).collect();
        let rows = outcomes.into_iter().flat_map(|o| o.band).collect();
        let report = RunReport {
            snapshot: WorldSnapshot::from_rows(rows),
            elapsed,
            ranks: self.ranks,
            threads: self.config.threads,
            ticks: self.config.ticks,
            rank_metrics,
        };
        info!(
            "{} ticks of {}x{} on {} ranks x {} threads in {:.6}s, {} alive",
            report.ticks,
            self.config.height,
            self.config.width,
            report.ranks,
            report.threads,
            report.elapsed.as_secs_f64(),
            report.snapshot.alive_count()
        );
        Ok(report)
    }

    fn run_one(&self, endpoint: &halo_comm::LocalEndpoint) -> Result<RankOutcome, RunError> {
        let streams = match (self.streams)(endpoint.rank(), &self.config) {
            Ok(streams) => streams,
            Err(e) => {
                endpoint.abort();
                return Err(e.into());
            }
        };
        run_rank(
            &self.config,
            &self.seeding,
            streams.as_ref(),
            self.policy.as_ref(),
            endpoint,
        )
    }
}
