//! Domain decomposition for Halo simulations.
//!
//! The global `height × width` torus is split into contiguous row bands,
//! one per rank, and each band is split again into contiguous sub-bands,
//! one per worker thread.
//!
//! - [`RankLayout`]: one rank's band, ghost-row layout and ring neighbours
//! - [`Ring`]: the cyclic neighbour relation over all ranks
//! - [`ThreadBands`]: row assignment of a band across worker threads
//! - [`wrap`]: toroidal column arithmetic
//!
//! Uneven splits are rejected with a [`PartitionError`] rather than
//! truncated.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bands;
pub mod error;
pub mod partition;
pub mod ring;
pub mod wrap;

pub use bands::ThreadBands;
pub use error::PartitionError;
pub use partition::RankLayout;
pub use ring::Ring;
