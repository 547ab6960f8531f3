//! Cyclic neighbour relation over ranks.

use halo_core::RankId;

use crate::error::PartitionError;

/// The ring of `size` ranks: band `i` is adjacent to bands `i - 1` and
/// `i + 1` modulo `size`.
///
/// With a single rank both neighbours are the rank itself; callers must
/// treat that as a self-exchange (see [`Ring::is_self_loop`]).
///
/// # Examples
///
/// ```
/// use halo_core::RankId;
/// use halo_space::Ring;
///
/// let ring = Ring::new(4).unwrap();
/// assert_eq!(ring.prev(RankId(0)), RankId(3));
/// assert_eq!(ring.next(RankId(3)), RankId(0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ring {
    size: usize,
}

impl Ring {
    /// Create a ring over `size` ranks.
    ///
    /// Returns `Err(PartitionError::ZeroRanks)` if `size == 0`.
    pub fn new(size: usize) -> Result<Self, PartitionError> {
        if size == 0 {
            return Err(PartitionError::ZeroRanks);
        }
        Ok(Self { size })
    }

    /// Number of ranks in the ring.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The rank owning the band above `rank` (wrapping at the top).
    pub fn prev(&self, rank: RankId) -> RankId {
        debug_assert!(rank.0 < self.size);
        if rank.0 == 0 {
            RankId(self.size - 1)
        } else {
            RankId(rank.0 - 1)
        }
    }

    /// The rank owning the band below `rank` (wrapping at the bottom).
    pub fn next(&self, rank: RankId) -> RankId {
        debug_assert!(rank.0 < self.size);
        if rank.0 == self.size - 1 {
            RankId(0)
        } else {
            RankId(rank.0 + 1)
        }
    }

    /// A single rank is its own predecessor and successor.
    pub fn is_self_loop(&self) -> bool {
        self.size == 1
    }

    /// Walk the ring from rank 0 following `next`, yielding each rank once.
    pub fn walk(&self) -> impl Iterator<Item = RankId> + '_ {
        let mut cur = RankId(0);
        (0..self.size).map(move |_| {
            let here = cur;
            cur = self.next(cur);
            here
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_ranks_rejected() {
        assert_eq!(Ring::new(0), Err(PartitionError::ZeroRanks));
    }

    #[test]
    fn single_rank_points_at_itself() {
        let ring = Ring::new(1).unwrap();
        assert!(ring.is_self_loop());
        assert_eq!(ring.prev(RankId(0)), RankId(0));
        assert_eq!(ring.next(RankId(0)), RankId(0));
    }

    #[test]
    fn two_ranks_share_both_links() {
        let ring = Ring::new(2).unwrap();
        assert!(!ring.is_self_loop());
        assert_eq!(ring.prev(RankId(0)), RankId(1));
        assert_eq!(ring.next(RankId(0)), RankId(1));
        assert_eq!(ring.prev(RankId(1)), RankId(0));
        assert_eq!(ring.next(RankId(1)), RankId(0));
    }

    proptest! {
        #[test]
        fn prev_inverts_next(size in 1usize..64, r in 0usize..64) {
            let ring = Ring::new(size).unwrap();
            let rank = RankId(r % size);
            prop_assert_eq!(ring.prev(ring.next(rank)), rank);
            prop_assert_eq!(ring.next(ring.prev(rank)), rank);
        }

        #[test]
        fn walk_is_a_single_cycle(size in 1usize..64) {
            let ring = Ring::new(size).unwrap();
            let visited: Vec<RankId> = ring.walk().collect();
            prop_assert_eq!(visited.len(), size);
            let mut seen = vec![false; size];
            for r in &visited {
                prop_assert!(!seen[r.0], "rank {} visited twice", r);
                seen[r.0] = true;
            }
            // Closing the cycle returns to the start.
            prop_assert_eq!(ring.next(*visited.last().unwrap()), RankId(0));
        }
    }
}
