//! Row-to-stream mapping.
//!
//! Every draw for a cell comes from the stream keyed by the cell's row.
//! Which row identity is used is a policy. Keying by local offset is the
//! default: rows at the same offset on different ranks share a stream
//! index (and, with identically seeded banks, the same values). Keying
//! by global row makes the outcome independent of how the grid is
//! decomposed.

use halo_core::StreamIndex;
use halo_space::RankLayout;

use crate::config::StreamKeying;

/// Maps an owned local row of a rank to the stream its cells draw from.
pub trait RowStreamPolicy: Send + Sync {
    /// Stream for every cell of `local_row` (an owned row, `1..=rows`).
    fn stream_for(&self, layout: &RankLayout, local_row: usize) -> StreamIndex;
}

/// Stream = `local_row - 1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalOffset;

impl RowStreamPolicy for LocalOffset {
    fn stream_for(&self, layout: &RankLayout, local_row: usize) -> StreamIndex {
        debug_assert!(layout.owned_rows().contains(&local_row));
        StreamIndex(local_row - 1)
    }
}

/// Stream = global row of `local_row`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalRow;

impl RowStreamPolicy for GlobalRow {
    fn stream_for(&self, layout: &RankLayout, local_row: usize) -> StreamIndex {
        StreamIndex(layout.global_row(local_row))
    }
}

impl RowStreamPolicy for StreamKeying {
    fn stream_for(&self, layout: &RankLayout, local_row: usize) -> StreamIndex {
        match self {
            StreamKeying::LocalOffset => LocalOffset.stream_for(layout, local_row),
            StreamKeying::GlobalRow => GlobalRow.stream_for(layout, local_row),
        }
    }
}
