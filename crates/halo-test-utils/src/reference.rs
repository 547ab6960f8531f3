//! Serial reference simulator.
//!
//! Runs the gated life-like rule on a whole torus in one buffer pair,
//! with no bands, ghost rows or threads. Draw order matches the engine:
//! cells of a row left to right, two draws for a gated cell, one
//! otherwise, each row on the stream chosen by the caller.

use halo_core::{Cell, StreamIndex, WorldSnapshot};
use halo_rng::RandomStreams;

/// A whole-grid simulator for cross-checking decomposed runs.
#[derive(Clone, Debug)]
pub struct Reference {
    grid: WorldSnapshot,
    threshold: f64,
}

impl Reference {
    /// Start from `grid`.
    pub fn new(grid: WorldSnapshot, threshold: f64) -> Self {
        Self { grid, threshold }
    }

    /// Start from the random fill: each cell of global row `r` is alive
    /// iff a draw from stream `r` is `>= 0.5`.
    pub fn random(
        height: usize,
        width: usize,
        threshold: f64,
        streams: &dyn RandomStreams,
    ) -> Self {
        let mut grid = WorldSnapshot::new(height, width);
        for r in 0..height {
            for c in 0..width {
                grid.set(r, c, Cell::from_coin(streams.draw(StreamIndex(r))));
            }
        }
        Self::new(grid, threshold)
    }

    pub fn snapshot(&self) -> &WorldSnapshot {
        &self.grid
    }

    /// Advance one tick; row `r` draws from `stream_for(r)`.
    pub fn step(
        &mut self,
        streams: &dyn RandomStreams,
        stream_for: impl Fn(usize) -> StreamIndex,
    ) {
        let (w, h) = (self.grid.width(), self.grid.height());
        let mut next = WorldSnapshot::new(h, w);
        for r in 0..h {
            let stream = stream_for(r);
            for c in 0..w {
                let gate = streams.draw(stream);
                let cell = if gate <= self.threshold {
                    Cell::from_coin(streams.draw(stream))
                } else {
                    let n = self.neighbours(r, c);
                    match (self.grid.get(r, c), n) {
                        (Cell::Alive, 2 | 3) | (Cell::Dead, 3) => Cell::Alive,
                        _ => Cell::Dead,
                    }
                };
                next.set(r, c, cell);
            }
        }
        self.grid = next;
    }

    /// Advance `ticks` ticks.
    pub fn run(
        &mut self,
        ticks: u64,
        streams: &dyn RandomStreams,
        stream_for: impl Fn(usize) -> StreamIndex,
    ) {
        for _ in 0..ticks {
            self.step(streams, &stream_for);
        }
    }

    fn neighbours(&self, r: usize, c: usize) -> u8 {
        let (w, h) = (self.grid.width(), self.grid.height());
        let mut n = 0;
        for (i, dr) in [h - 1, 0, 1].into_iter().enumerate() {
            for (j, dc) in [w - 1, 0, 1].into_iter().enumerate() {
                if (i, j) == (1, 1) {
                    continue;
                }
                n += self.grid.get((r + dr) % h, (c + dc) % w).to_raw();
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{snapshot_from_rows, FixedStreams};

    #[test]
    fn blinker_oscillates() {
        let start = snapshot_from_rows(&[
            &[0, 0, 0, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 0, 0, 0],
        ]);
        let mut sim = Reference::new(start.clone(), 0.0);
        let streams = FixedStreams::new(0.5);
        sim.step(&streams, StreamIndex);
        assert_eq!(
            sim.snapshot(),
            &snapshot_from_rows(&[
                &[0, 0, 0, 0, 0],
                &[0, 0, 0, 0, 0],
                &[0, 1, 1, 1, 0],
                &[0, 0, 0, 0, 0],
                &[0, 0, 0, 0, 0],
            ])
        );
        sim.step(&streams, StreamIndex);
        assert_eq!(sim.snapshot(), &start);
    }

    #[test]
    fn fully_gated_follows_the_coin() {
        let mut sim = Reference::new(WorldSnapshot::new(3, 3), 1.0);
        sim.step(&FixedStreams::new(0.6), StreamIndex);
        assert_eq!(sim.snapshot().alive_count(), 9);
    }
}
