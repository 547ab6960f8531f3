//! Rank-to-rank communication for Halo simulations.
//!
//! The engine talks to its peers only through the [`Transport`] trait:
//! non-blocking sends and blocking receives of fixed-length integer rows,
//! addressed by rank and [`Tag`], plus a group-wide barrier and an abort
//! switch. [`LocalCluster`] implements it for ranks running as threads
//! of one process, using one crossbeam channel per
//! `(source, destination, tag)`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod local;
pub mod transport;

pub use local::{AbortHandle, LocalCluster, LocalEndpoint};
pub use transport::{Tag, Transport};
