//! Core types for the Halo simulation workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! cell alphabet, strongly-typed identifiers, the assembled global
//! [`WorldSnapshot`], the error types shared across layers, and the
//! poisonable [`PhaseBarrier`] used by both the rank-local thread layer
//! and the in-process cluster.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod id;
pub mod snapshot;
pub mod sync;

pub use cell::Cell;
pub use error::{CommError, ResourceError};
pub use id::{RankId, StreamIndex, ThreadIndex, TickId};
pub use snapshot::WorldSnapshot;
pub use sync::{BarrierPoisoned, PhaseBarrier};
