//! Double-buffered ping-pong world state.
//!
//! [`WorldState`] owns two equally shaped [`BandGrid`]s that alternate
//! between "current" (read-only during compute, ghost rows written by
//! the exchange) and "next" (written by compute). [`WorldState::swap`]
//! exchanges the roles in O(1) by flipping an index; no cells move.
//!
//! The lifecycle per tick is:
//! 1. `swap()`: last tick's "next" becomes "current"
//! 2. halo exchange writes the ghost rows of `current()`
//! 3. compute reads `current()` and writes every owned cell of `next()`

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use halo_core::{Cell, ResourceError, WorldSnapshot};
use halo_space::RankLayout;

use crate::grid::BandGrid;

/// The two band grids of one rank plus the selector of the current one.
#[derive(Debug)]
pub struct WorldState {
    grids: [BandGrid; 2],
    /// Index of the current grid (0 or 1).
    current: AtomicUsize,
    /// Number of swaps performed, for diagnostics.
    swaps: AtomicU64,
    layout: RankLayout,
}

// Compile-time assertion: WorldState is shared by reference across the
// worker threads of a rank.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<WorldState>();
};

impl WorldState {
    /// Allocate both grids, `(rows_per_rank + 2) × width`, all dead.
    pub fn new(layout: RankLayout) -> Result<Self, ResourceError> {
        let rows = layout.buffer_rows();
        let width = layout.width();
        Ok(Self {
            grids: [BandGrid::new(rows, width)?, BandGrid::new(rows, width)?],
            current: AtomicUsize::new(0),
            swaps: AtomicU64::new(0),
            layout,
        })
    }

    /// The layout these buffers were shaped for.
    pub fn layout(&self) -> &RankLayout {
        &self.layout
    }

    /// The fully resolved state of the previous tick.
    #[inline]
    pub fn current(&self) -> &BandGrid {
        &self.grids[self.current.load(Ordering::Acquire)]
    }

    /// The buffer being written this tick. Stale until fully written.
    #[inline]
    pub fn next(&self) -> &BandGrid {
        &self.grids[self.current.load(Ordering::Acquire) ^ 1]
    }

    /// Exchange the roles of current and next.
    ///
    /// Must be called by exactly one thread while no other thread of the
    /// rank is reading or writing either buffer.
    pub fn swap(&self) {
        self.current.fetch_xor(1, Ordering::AcqRel);
        self.swaps.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of swaps performed so far.
    pub fn swaps(&self) -> u64 {
        self.swaps.load(Ordering::Relaxed)
    }

    /// Fill every owned cell of `next()` from `f(local_row, col)`, row by
    /// row, left to right. The following `swap()` publishes the fill.
    pub fn fill_next(&self, mut f: impl FnMut(usize, usize) -> Cell) {
        let next = self.next();
        for r in self.layout.owned_rows() {
            for c in 0..self.layout.width() {
                next.set(r, c, f(r, c));
            }
        }
    }

    /// Copy this rank's band out of a global snapshot into `next()`.
    ///
    /// # Panics
    ///
    /// Panics if the snapshot's shape differs from the layout's grid.
    pub fn load_next(&self, snapshot: &WorldSnapshot) {
        assert_eq!(snapshot.width(), self.layout.width(), "snapshot width mismatch");
        assert_eq!(snapshot.height(), self.layout.height(), "snapshot height mismatch");
        let start = self.layout.start_row();
        self.fill_next(|r, c| snapshot.get(start + r - 1, c));
    }

    /// Owned rows of `current()`, top to bottom.
    pub fn band_rows(&self) -> Vec<Vec<Cell>> {
        let current = self.current();
        self.layout
            .owned_rows()
            .map(|r| current.row_cells(r))
            .collect()
    }
}
