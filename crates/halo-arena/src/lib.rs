//! Double-buffered world state for Halo simulations.
//!
//! # Architecture
//!
//! ```text
//! WorldState (orchestrator)
//! ├── BandGrid × 2 (alternating current / next)
//! │   └── Box<[AtomicU8]>, (rows_per_rank + 2) × width, row-major
//! └── AtomicUsize selecting which grid is current
//! ```
//!
//! # Sharing discipline
//!
//! Every thread of a rank holds `&WorldState`. Cells are atomics accessed
//! with `Relaxed` ordering; all cross-thread visibility comes from the two
//! per-tick barriers. During the exchange phase only the coordinator
//! writes (ghost rows of current); during the compute phase threads write
//! disjoint rows of next and only read current. No locks, no `unsafe`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod grid;
pub mod pingpong;

pub use grid::BandGrid;
pub use pingpong::WorldState;
