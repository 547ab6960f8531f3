//! The stochastic per-cell update rule.
//!
//! For each owned cell, in row-major order within a band:
//!
//! 1. `gate = draw(stream)`
//! 2. `gate <= threshold`: `coin = draw(stream)`, next is `ALIVE` iff
//!    `coin >= 0.5`. Neighbours are not examined.
//! 3. otherwise: classic life rule on the 8-neighbourhood, columns
//!    wrapping modulo the width, rows read straight from the current
//!    buffer (ghost rows supply the neighbouring bands).
//!
//! A gated cell consumes exactly two draws, an ungated cell exactly one.
//! The consumption order is part of the contract: it is what makes runs
//! reproducible against a reference stream.

use std::ops::Range;

use halo_arena::{BandGrid, WorldState};
use halo_core::{Cell, StreamIndex};
use halo_rng::RandomStreams;
use halo_space::wrap::column_window;

use crate::config::SimConfig;
use crate::policy::RowStreamPolicy;

/// Life rule: survive on 2 or 3, birth on exactly 3, otherwise dead.
#[inline]
pub fn life_rule(current: Cell, alive_neighbours: u8) -> Cell {
    match (current, alive_neighbours) {
        (Cell::Alive, 2 | 3) => Cell::Alive,
        (Cell::Dead, 3) => Cell::Alive,
        _ => Cell::Dead,
    }
}

/// Alive cells among the 8 neighbours of `(row, col)`.
///
/// `row` must have a row above and below it in `grid` (any owned row of
/// a band grid does, thanks to the ghost rows).
#[inline]
pub fn alive_neighbours(grid: &BandGrid, row: usize, col: usize) -> u8 {
    assert!(
        row >= 1 && row + 1 < grid.rows(),
        "row {row} has no neighbour rows in a {}-row grid",
        grid.rows()
    );
    let cols = column_window(col, grid.width());
    let mut count = 0u8;
    for r in [row - 1, row, row + 1] {
        for (i, &c) in cols.iter().enumerate() {
            if r == row && i == 1 {
                continue;
            }
            count += grid.get(r, c).to_raw();
        }
    }
    count
}

/// The gated life-like rule with a fixed threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellRule {
    threshold: f64,
}

impl CellRule {
    /// Rule with gating threshold `threshold` (a fraction in `[0, 1]`).
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is NaN or outside `[0, 1]`.
    pub fn new(threshold: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&threshold),
            "threshold must be in [0, 1], got {threshold}"
        );
        Self { threshold }
    }

    /// Rule for a validated configuration.
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.threshold())
    }

    /// The gating threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Next state of `(row, col)` given the current buffer.
    pub fn next_state(
        &self,
        current: &BandGrid,
        row: usize,
        col: usize,
        stream: StreamIndex,
        streams: &dyn RandomStreams,
    ) -> Cell {
        let gate = streams.draw(stream);
        if gate <= self.threshold {
            Cell::from_coin(streams.draw(stream))
        } else {
            life_rule(current.get(row, col), alive_neighbours(current, row, col))
        }
    }

    /// Compute every cell of the owned local `rows` into `world.next()`.
    ///
    /// Reads only `world.current()`; writes only the given rows of
    /// `world.next()`.
    pub fn update_rows(
        &self,
        world: &WorldState,
        rows: Range<usize>,
        streams: &dyn RandomStreams,
        policy: &dyn RowStreamPolicy,
    ) {
        let layout = world.layout();
        let current = world.current();
        let next = world.next();
        for r in rows {
            let stream = policy.stream_for(layout, r);
            for c in 0..layout.width() {
                next.set(r, c, self.next_state(current, r, c, stream, streams));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::RankId;
    use halo_space::RankLayout;
    use halo_test_utils::{CountingStreams, FixedStreams};

    const A: Cell = Cell::Alive;
    const D: Cell = Cell::Dead;

    /// A 3×3 band (plus ghosts) with `alive` cells around the centre set.
    fn grid_with(alive: &[(usize, usize)], centre: Cell) -> BandGrid {
        let g = BandGrid::new(5, 5).unwrap();
        for &(r, c) in alive {
            g.set(r, c, A);
        }
        g.set(2, 2, centre);
        g
    }

    const RING: [(usize, usize); 8] = [
        (1, 1),
        (1, 2),
        (1, 3),
        (2, 1),
        (2, 3),
        (3, 1),
        (3, 2),
        (3, 3),
    ];

    #[test]
    fn life_rule_table() {
        for n in 0..=8u8 {
            let survive = if n == 2 || n == 3 { A } else { D };
            let birth = if n == 3 { A } else { D };
            assert_eq!(life_rule(A, n), survive, "alive with {n}");
            assert_eq!(life_rule(D, n), birth, "dead with {n}");
        }
    }

    #[test]
    fn neighbour_count_ignores_centre() {
        let g = grid_with(&[], A);
        assert_eq!(alive_neighbours(&g, 2, 2), 0);
        let g = grid_with(&RING, D);
        assert_eq!(alive_neighbours(&g, 2, 2), 8);
    }

    #[test]
    fn neighbour_count_wraps_columns() {
        let g = BandGrid::new(3, 5).unwrap();
        g.set(0, 4, A);
        g.set(1, 4, A);
        g.set(2, 4, A);
        assert_eq!(alive_neighbours(&g, 1, 0), 3);
        g.set(1, 0, A);
        assert_eq!(alive_neighbours(&g, 1, 4), 3);
    }

    #[test]
    fn neighbour_count_reads_ghost_rows() {
        let g = BandGrid::new(3, 3).unwrap();
        g.write_row(0, &[A, A, A]);
        g.write_row(2, &[A, D, D]);
        assert_eq!(alive_neighbours(&g, 1, 1), 4);
    }

    #[test]
    fn ungated_rule_applies_life() {
        let rule = CellRule::new(0.0);
        let streams = FixedStreams::new(0.9);
        // Birth on exactly 3.
        let g = grid_with(&RING[..3], D);
        assert_eq!(rule.next_state(&g, 2, 2, StreamIndex(0), &streams), A);
        // Survival on 2 and 3.
        let g = grid_with(&RING[..2], A);
        assert_eq!(rule.next_state(&g, 2, 2, StreamIndex(0), &streams), A);
        let g = grid_with(&RING[..3], A);
        assert_eq!(rule.next_state(&g, 2, 2, StreamIndex(0), &streams), A);
        // Death by isolation and overcrowding.
        for n in [0, 1, 4, 5, 8] {
            let g = grid_with(&RING[..n], A);
            assert_eq!(rule.next_state(&g, 2, 2, StreamIndex(0), &streams), D, "n = {n}");
        }
        // A dead cell without exactly 3 stays dead.
        for n in [0, 2, 4, 8] {
            let g = grid_with(&RING[..n], D);
            assert_eq!(rule.next_state(&g, 2, 2, StreamIndex(0), &streams), D, "n = {n}");
        }
    }

    #[test]
    fn gated_rule_ignores_neighbours() {
        let rule = CellRule::new(1.0);
        for n in [0, 2, 3, 8] {
            for centre in [A, D] {
                let g = grid_with(&RING[..n], centre);
                // Both draws are 0.7: gate <= 1.0, coin >= 0.5.
                assert_eq!(rule.next_state(&g, 2, 2, StreamIndex(0), &FixedStreams::new(0.7)), A);
                // Both draws are 0.2: gate <= 1.0, coin < 0.5.
                assert_eq!(rule.next_state(&g, 2, 2, StreamIndex(0), &FixedStreams::new(0.2)), D);
            }
        }
    }

    #[test]
    fn gate_equal_to_threshold_is_gated() {
        let rule = CellRule::new(0.5);
        let g = grid_with(&[], D);
        // gate 0.5 <= 0.5, coin 0.5 >= 0.5: alive despite zero neighbours.
        assert_eq!(rule.next_state(&g, 2, 2, StreamIndex(0), &FixedStreams::new(0.5)), A);
    }

    #[test]
    fn draw_counts_per_branch() {
        let g = grid_with(&[], D);
        let gated = CountingStreams::new(FixedStreams::new(0.1), 4);
        CellRule::new(0.5).next_state(&g, 2, 2, StreamIndex(3), &gated);
        assert_eq!(gated.draws(StreamIndex(3)), 2);
        assert_eq!(gated.total(), 2);

        let ungated = CountingStreams::new(FixedStreams::new(0.9), 4);
        CellRule::new(0.5).next_state(&g, 2, 2, StreamIndex(1), &ungated);
        assert_eq!(ungated.draws(StreamIndex(1)), 1);
        assert_eq!(ungated.total(), 1);
    }

    #[test]
    fn update_rows_writes_only_next() {
        let layout = RankLayout::new(4, 4, 1, RankId(0)).unwrap();
        let world = WorldState::new(layout).unwrap();
        world.current().set(2, 2, A);
        let streams = FixedStreams::new(0.9);
        CellRule::new(0.0).update_rows(&world, 1..3, &streams, &crate::policy::LocalOffset);
        // Current untouched, isolated cell dies in next.
        assert_eq!(world.current().get(2, 2), A);
        assert_eq!(world.next().get(2, 2), D);
    }

    #[test]
    fn update_rows_draws_from_policy_stream() {
        let layout = RankLayout::new(4, 3, 2, RankId(1)).unwrap();
        let world = WorldState::new(layout).unwrap();
        let streams = CountingStreams::new(FixedStreams::new(0.9), 8);
        CellRule::new(0.0).update_rows(&world, 1..3, &streams, &crate::policy::GlobalRow);
        // Rank 1 owns global rows 2 and 3; one draw per cell.
        assert_eq!(streams.draws(StreamIndex(2)), 3);
        assert_eq!(streams.draws(StreamIndex(3)), 3);
        assert_eq!(streams.total(), 6);
    }

    #[test]
    #[should_panic(expected = "threshold must be in [0, 1]")]
    fn threshold_above_one_rejected() {
        let _ = CellRule::new(1.5);
    }
}
