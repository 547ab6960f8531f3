//! Test utilities for Halo development.
//!
//! - [`streams`]: scripted [`RandomStreams`](halo_rng::RandomStreams)
//!   implementations ([`FixedStreams`], [`CyclingStreams`],
//!   [`CountingStreams`]).
//! - [`reference`]: a serial whole-torus simulator, [`Reference`], to
//!   check decomposed runs against.
//! - [`snapshot_from_rows`]: build a grid from `0`/`1` literals.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod reference;
pub mod streams;

pub use reference::Reference;
pub use streams::{CountingStreams, CyclingStreams, FixedStreams};

use halo_core::{Cell, WorldSnapshot};

/// Build a snapshot from rows of `0` (dead) and `1` (alive).
///
/// # Panics
///
/// Panics on any other value or on ragged rows.
pub fn snapshot_from_rows(rows: &[&[u8]]) -> WorldSnapshot {
    WorldSnapshot::from_rows(
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|&v| Cell::from_raw(v).unwrap_or_else(|| panic!("bad cell literal {v}")))
                    .collect()
            })
            .collect(),
    )
}
