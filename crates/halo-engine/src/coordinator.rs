//! The per-rank thread state machine.
//!
//! A rank runs `T` threads over its band. Thread 0 (the coordinator)
//! owns the transport; threads `1..T` only compute. Two phase barriers
//! separate the phases of every tick:
//!
//! ```text
//!            ┌──────────── tick ────────────┐
//! thread 0:  swap, exchange ─ A ─ compute ─ B
//! thread t:  (wait) ───────── A ─ compute ─ B
//! ```
//!
//! After barrier A every ghost row of the current buffer is filled and
//! nobody writes the current buffer until the next swap. After barrier B
//! every owned row of the next buffer is written and nobody reads it
//! until the swap that publishes it. The swap and the exchange happen
//! while the compute threads are parked between B and A, so they see no
//! concurrent access.
//!
//! Any failure poisons both barriers. Parked threads wake with
//! [`BarrierPoisoned`] and leave their loop, so a failing thread never
//! strands its siblings.

use std::fmt;
use std::ops::Range;
use std::thread;
use std::time::Instant;

use log::trace;

use halo_arena::WorldState;
use halo_comm::Transport;
use halo_core::{BarrierPoisoned, PhaseBarrier, ResourceError, ThreadIndex, TickId};
use halo_rng::RandomStreams;
use halo_space::ThreadBands;

use crate::error::RunError;
use crate::exchange::exchange_halo;
use crate::metrics::RankMetrics;
use crate::policy::RowStreamPolicy;
use crate::rule::CellRule;

/// Phase of a tick, as seen by thread 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Swap the buffers and fill the ghost rows.
    Exchange,
    /// Compute the next buffer from the current one.
    Compute,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exchange => f.write_str("exchange"),
            Self::Compute => f.write_str("compute"),
        }
    }
}

/// Everything a compute thread needs. Shared by reference across the
/// rank's threads; holds no transport.
struct Shared<'a> {
    world: &'a WorldState,
    rule: CellRule,
    streams: &'a dyn RandomStreams,
    policy: &'a dyn RowStreamPolicy,
    after_exchange: PhaseBarrier,
    after_compute: PhaseBarrier,
}

impl Shared<'_> {
    fn poison(&self) {
        self.after_exchange.poison();
        self.after_compute.poison();
    }

    fn compute(&self, rows: Range<usize>) {
        self.rule
            .update_rows(self.world, rows, self.streams, self.policy);
    }

    /// Loop of threads `1..T`.
    fn worker(&self, rows: Range<usize>, ticks: u64) -> Result<(), BarrierPoisoned> {
        let _guard = PoisonOnPanic(self);
        for _ in 0..ticks {
            self.after_exchange.wait()?;
            self.compute(rows.clone());
            self.after_compute.wait()?;
        }
        Ok(())
    }
}

/// Poisons the phase barriers if the owning thread unwinds.
struct PoisonOnPanic<'s, 'a>(&'s Shared<'a>);

impl Drop for PoisonOnPanic<'_, '_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.poison();
        }
    }
}

/// Drives one rank's threads through `ticks` ticks.
///
/// On success the world's current buffer holds the final generation:
/// the coordinator performs one extra swap after the last tick to
/// publish the buffer the last compute phase wrote.
pub struct BandCoordinator<'a> {
    world: &'a WorldState,
    bands: &'a ThreadBands,
    rule: CellRule,
    streams: &'a dyn RandomStreams,
    policy: &'a dyn RowStreamPolicy,
}

impl<'a> BandCoordinator<'a> {
    /// Coordinator over `world`, split across threads as `bands`.
    pub fn new(
        world: &'a WorldState,
        bands: &'a ThreadBands,
        rule: CellRule,
        streams: &'a dyn RandomStreams,
        policy: &'a dyn RowStreamPolicy,
    ) -> Self {
        Self {
            world,
            bands,
            rule,
            streams,
            policy,
        }
    }

    /// Run `ticks` ticks, exchanging ghost rows through `transport`.
    ///
    /// Spawns threads `1..T` as scoped threads and runs thread 0 on the
    /// caller's thread.
    ///
    /// # Errors
    ///
    /// - [`RunError::Comm`] if the exchange fails.
    /// - [`RunError::Resource`] if a worker thread cannot be spawned.
    /// - [`RunError::WorkerPanicked`] if a worker thread panicked.
    /// - [`RunError::PhaseAborted`] if a barrier was poisoned.
    pub fn run<T>(&self, transport: &T, ticks: u64) -> Result<RankMetrics, RunError>
    where
        T: Transport + ?Sized,
    {
        let threads = self.bands.threads();
        let rank = self.world.layout().rank();
        let shared = Shared {
            world: self.world,
            rule: self.rule,
            streams: self.streams,
            policy: self.policy,
            after_exchange: PhaseBarrier::new(threads),
            after_compute: PhaseBarrier::new(threads),
        };
        let shared = &shared;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(threads.saturating_sub(1));
            let mut spawn_error = None;
            for (t, rows) in self.bands.iter().skip(1) {
                let spawned = thread::Builder::new()
                    .name(format!("halo-r{rank}-t{t}"))
                    .spawn_scoped(scope, move || shared.worker(rows, ticks));
                match spawned {
                    Ok(handle) => handles.push((t, handle)),
                    Err(e) => {
                        shared.poison();
                        spawn_error = Some(ResourceError::ThreadSpawnFailed {
                            reason: e.to_string(),
                        });
                        break;
                    }
                }
            }

            let mut result = match spawn_error {
                Some(e) => Err(RunError::Resource(e)),
                None => self.lead(shared, transport, ticks),
            };

            for (t, handle) in handles {
                // A worker panic is the root cause of any poisoned barrier
                // the coordinator observed.
                if handle.join().is_err()
                    && result.as_ref().err().is_none_or(RunError::is_secondary)
                {
                    result = Err(RunError::WorkerPanicked { rank, thread: t });
                }
            }
            result
        })
    }

    /// Loop of thread 0.
    fn lead<T>(
        &self,
        shared: &Shared<'_>,
        transport: &T,
        ticks: u64,
    ) -> Result<RankMetrics, RunError>
    where
        T: Transport + ?Sized,
    {
        let _guard = PoisonOnPanic(shared);
        let rank = self.world.layout().rank();
        let own_rows = self.bands.rows_for(ThreadIndex::COORDINATOR);
        let aborted = |_: BarrierPoisoned| RunError::PhaseAborted { rank };
        let mut metrics = RankMetrics::default();

        for tick in 0..ticks {
            let tick = TickId(tick);
            trace!("rank {rank} tick {tick}: {}", Phase::Exchange);
            let started = Instant::now();
            self.world.swap();
            if let Err(e) = exchange_halo(self.world, transport) {
                shared.poison();
                return Err(e.into());
            }
            metrics.add_exchange(started.elapsed());

            trace!("rank {rank} tick {tick}: {}", Phase::Compute);
            let started = Instant::now();
            shared.after_exchange.wait().map_err(aborted)?;
            shared.compute(own_rows.clone());
            shared.after_compute.wait().map_err(aborted)?;
            metrics.add_compute(started.elapsed());
            metrics.ticks += 1;
        }

        self.world.swap();
        Ok(metrics)
    }
}
