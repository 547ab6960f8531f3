//! Simulation engine for Halo cellular automata.
//!
//! Runs a stochastic life-like automaton on a torus split into row bands
//! across ranks, each band further split across worker threads.
//!
//! Per tick, on every rank:
//!
//! ```text
//! thread 0: swap ─ halo exchange ─┐                ┌─ next tick
//!                                  barrier A ─ compute ─ barrier B
//! threads 1..T: (idle) ───────────┘                └─ next tick
//! ```
//!
//! - [`config`]: immutable [`SimConfig`] and its validation
//! - [`policy`]: pluggable row-to-random-stream mapping
//! - [`rule`]: the per-cell update rule
//! - [`exchange`]: the ghost-row exchange protocol
//! - [`coordinator`]: the two-barrier thread state machine
//! - [`rank`]: one rank's lifecycle (allocate, seed, run, report)
//! - [`cluster`]: an in-process cluster of ranks, [`Simulation`]
//! - [`metrics`]: per-rank timing
//! - [`output`]: the elapsed-time log file

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod exchange;
pub mod metrics;
pub mod output;
pub mod policy;
pub mod rank;
pub mod rule;

pub use cluster::{RunReport, Simulation, SimulationBuilder, StreamFactory};
pub use config::{ConfigError, SimConfig, StreamKeying};
pub use coordinator::{BandCoordinator, Phase};
pub use error::RunError;
pub use exchange::exchange_halo;
pub use metrics::RankMetrics;
pub use policy::{GlobalRow, LocalOffset, RowStreamPolicy};
pub use rank::{run_rank, RankOutcome, Seeding};
pub use rule::CellRule;
