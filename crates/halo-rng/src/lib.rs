//! Indexed random streams for Halo simulations.
//!
//! The update rule consumes uniform draws in `[0, 1)` from many
//! independent streams keyed by an integer index. The [`RandomStreams`]
//! trait is that contract; [`ChaChaStreams`] is the default
//! implementation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod streams;

pub use streams::{ChaChaStreams, RandomStreams, DEFAULT_STREAM_COUNT};
