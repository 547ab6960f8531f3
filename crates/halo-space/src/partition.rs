//! Per-rank band layout.

use std::ops::Range;

use halo_core::RankId;

use crate::error::PartitionError;
use crate::ring::Ring;

/// One rank's share of the global grid.
///
/// The rank owns global rows `[start_row, start_row + rows_per_rank)`.
/// Its local buffers have `rows_per_rank + 2` rows:
///
/// ```text
/// local 0                 ghost: bottom real row of ring_prev
/// local 1 ..= rows        owned rows (global start_row ..)
/// local rows + 1          ghost: top real row of ring_next
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankLayout {
    rank: RankId,
    ring: Ring,
    width: usize,
    height: usize,
    rows_per_rank: usize,
    start_row: usize,
}

impl RankLayout {
    /// Compute the layout of `rank` in a `height × width` grid split
    /// across `ranks` ranks.
    ///
    /// # Errors
    ///
    /// - `ZeroRanks` if `ranks == 0`
    /// - `EmptyGrid` if `height` or `width` is zero
    /// - `UnevenRanks` if `height % ranks != 0` or `height < ranks`
    /// - `RankOutOfRange` if `rank >= ranks`
    pub fn new(
        height: usize,
        width: usize,
        ranks: usize,
        rank: RankId,
    ) -> Result<Self, PartitionError> {
        let ring = Ring::new(ranks)?;
        if height == 0 || width == 0 {
            return Err(PartitionError::EmptyGrid);
        }
        if height % ranks != 0 || height < ranks {
            return Err(PartitionError::UnevenRanks { height, ranks });
        }
        if rank.0 >= ranks {
            return Err(PartitionError::RankOutOfRange { rank, ranks });
        }
        let rows_per_rank = height / ranks;
        Ok(Self {
            rank,
            ring,
            width,
            height,
            rows_per_rank,
            start_row: rank.0 * rows_per_rank,
        })
    }

    /// Layouts of every rank, in rank order.
    pub fn all(height: usize, width: usize, ranks: usize) -> Result<Vec<Self>, PartitionError> {
        (0..ranks)
            .map(|r| Self::new(height, width, ranks, RankId(r)))
            .collect()
    }

    /// This rank.
    pub fn rank(&self) -> RankId {
        self.rank
    }

    /// Number of ranks in the group.
    pub fn ranks(&self) -> usize {
        self.ring.size()
    }

    /// The ring topology this layout belongs to.
    pub fn ring(&self) -> Ring {
        self.ring
    }

    /// Grid width (identical on every rank).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Global grid height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of rows owned by each rank.
    pub fn rows_per_rank(&self) -> usize {
        self.rows_per_rank
    }

    /// First global row owned by this rank.
    pub fn start_row(&self) -> usize {
        self.start_row
    }

    /// Global rows owned by this rank.
    pub fn global_rows(&self) -> Range<usize> {
        self.start_row..self.start_row + self.rows_per_rank
    }

    /// Rank owning the band above (`ringPrev`).
    pub fn ring_prev(&self) -> RankId {
        self.ring.prev(self.rank)
    }

    /// Rank owning the band below (`ringNext`).
    pub fn ring_next(&self) -> RankId {
        self.ring.next(self.rank)
    }

    /// Both neighbour links point back at this rank.
    pub fn is_self_exchange(&self) -> bool {
        self.ring.is_self_loop()
    }

    /// Rows in each local buffer, ghosts included.
    pub fn buffer_rows(&self) -> usize {
        self.rows_per_rank + 2
    }

    /// Local indices of the owned rows.
    pub fn owned_rows(&self) -> Range<usize> {
        1..self.rows_per_rank + 1
    }

    /// Local index of the ghost row above the band.
    pub fn top_ghost(&self) -> usize {
        0
    }

    /// Local index of the ghost row below the band.
    pub fn bottom_ghost(&self) -> usize {
        self.rows_per_rank + 1
    }

    /// Local index of the first owned row (sent to `ring_prev`).
    pub fn top_row(&self) -> usize {
        1
    }

    /// Local index of the last owned row (sent to `ring_next`).
    pub fn bottom_row(&self) -> usize {
        self.rows_per_rank
    }

    /// Global row of an owned local row.
    ///
    /// # Panics
    ///
    /// Panics if `local_row` is a ghost row or out of range.
    pub fn global_row(&self, local_row: usize) -> usize {
        assert!(
            self.owned_rows().contains(&local_row),
            "local row {local_row} is not owned by rank {}",
            self.rank
        );
        self.start_row + local_row - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_rank_layout() {
        let l = RankLayout::new(12, 5, 3, RankId(1)).unwrap();
        assert_eq!(l.rows_per_rank(), 4);
        assert_eq!(l.start_row(), 4);
        assert_eq!(l.global_rows(), 4..8);
        assert_eq!(l.ring_prev(), RankId(0));
        assert_eq!(l.ring_next(), RankId(2));
        assert_eq!(l.buffer_rows(), 6);
        assert_eq!(l.owned_rows(), 1..5);
        assert_eq!(l.top_ghost(), 0);
        assert_eq!(l.bottom_ghost(), 5);
        assert_eq!(l.global_row(1), 4);
        assert_eq!(l.global_row(4), 7);
    }

    #[test]
    fn edge_ranks_wrap() {
        let first = RankLayout::new(12, 5, 3, RankId(0)).unwrap();
        assert_eq!(first.ring_prev(), RankId(2));
        let last = RankLayout::new(12, 5, 3, RankId(2)).unwrap();
        assert_eq!(last.ring_next(), RankId(0));
    }

    #[test]
    fn single_rank_is_self_exchange() {
        let l = RankLayout::new(4, 4, 1, RankId(0)).unwrap();
        assert!(l.is_self_exchange());
        assert_eq!(l.ring_prev(), RankId(0));
        assert_eq!(l.ring_next(), RankId(0));
    }

    #[test]
    fn uneven_split_is_an_error() {
        assert_eq!(
            RankLayout::new(10, 4, 3, RankId(0)),
            Err(PartitionError::UnevenRanks {
                height: 10,
                ranks: 3
            })
        );
        // More ranks than rows would give empty bands.
        assert!(matches!(
            RankLayout::new(2, 4, 4, RankId(0)),
            Err(PartitionError::UnevenRanks { .. })
        ));
    }

    #[test]
    fn degenerate_inputs_rejected() {
        assert_eq!(RankLayout::new(4, 4, 0, RankId(0)), Err(PartitionError::ZeroRanks));
        assert_eq!(RankLayout::new(0, 4, 1, RankId(0)), Err(PartitionError::EmptyGrid));
        assert_eq!(RankLayout::new(4, 0, 1, RankId(0)), Err(PartitionError::EmptyGrid));
        assert_eq!(
            RankLayout::new(4, 4, 2, RankId(2)),
            Err(PartitionError::RankOutOfRange {
                rank: RankId(2),
                ranks: 2
            })
        );
    }

    #[test]
    #[should_panic(expected = "not owned")]
    fn ghost_rows_have_no_global_row() {
        let l = RankLayout::new(4, 4, 1, RankId(0)).unwrap();
        let _ = l.global_row(0);
    }
}
