//! Halo: a stochastic life-like cellular automaton on a torus.
//!
//! The grid is split into row bands across ranks, and each band across
//! worker threads. Ranks exchange their edge rows with their ring
//! neighbours every tick ("halo exchange"); threads within a rank
//! synchronise with two phase barriers.
//!
//! This is the facade crate that re-exports the public API of the Halo
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use halo::prelude::*;
//!
//! let config = SimConfig::new(2, 16, 16, 10, 5);
//! let report = Simulation::builder(config).ranks(4).build()?.run()?;
//! assert_eq!(report.snapshot.height(), 16);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `halo-core` | `Cell`, ids, `WorldSnapshot`, `PhaseBarrier`, errors |
//! | [`space`] | `halo-space` | rank layout, ring, thread bands, column wrap |
//! | [`arena`] | `halo-arena` | double-buffered band storage |
//! | [`rng`] | `halo-rng` | indexed random streams |
//! | [`comm`] | `halo-comm` | transport trait and in-process cluster |
//! | [`engine`] | `halo-engine` | config, rule, exchange, coordinator, simulation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, ids and errors (`halo-core`).
pub use halo_core as types;

/// Grid partitioning and topology (`halo-space`).
pub use halo_space as space;

/// Double-buffered band storage (`halo-arena`).
///
/// [`arena::WorldState`] owns one rank's current and next buffers.
pub use halo_arena as arena;

/// Indexed random streams (`halo-rng`).
pub use halo_rng as rng;

/// Rank-to-rank transport (`halo-comm`).
///
/// [`comm::Transport`] is the seam for other process-group backends;
/// [`comm::LocalCluster`] runs ranks as threads.
pub use halo_comm as comm;

/// Simulation engine (`halo-engine`).
pub use halo_engine as engine;

/// Common imports for typical Halo usage.
///
/// ```rust
/// use halo::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use halo_core::{Cell, RankId, StreamIndex, ThreadIndex, WorldSnapshot};

    // Errors
    pub use halo_core::{CommError, ResourceError};
    pub use halo_engine::{ConfigError, RunError};

    // Random streams
    pub use halo_rng::{ChaChaStreams, RandomStreams};

    // Engine
    pub use halo_engine::{
        GlobalRow, LocalOffset, RankMetrics, RowStreamPolicy, RunReport, Seeding, SimConfig,
        Simulation, StreamKeying,
    };
}
