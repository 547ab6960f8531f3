//! Owned copy of the global grid, assembled from every rank's band.

use std::fmt;

use crate::cell::Cell;

/// Row-major copy of the full `height × width` grid.
///
/// Produced once at the end of a run (or built by hand as an initial
/// pattern). Never shared with the compute phase, so it is a plain
/// `Vec<Cell>` rather than the atomic storage used by the world state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSnapshot {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl WorldSnapshot {
    /// An all-dead `height × width` grid.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Dead; width * height],
        }
    }

    /// Build a snapshot from a list of equally long rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for (r, row) in rows.into_iter().enumerate() {
            assert_eq!(
                row.len(),
                width,
                "row {r} has {} cells, expected {width}",
                row.len()
            );
            cells.extend(row);
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Overwrite the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let idx = self.index(row, col);
        self.cells[idx] = cell;
    }

    /// One full row.
    pub fn row(&self, row: usize) -> &[Cell] {
        assert!(row < self.height, "row {row} out of range (height {})", self.height);
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks_exact(0) panics; an empty grid has no rows anyway.
        self.cells.chunks_exact(self.width.max(1))
    }

    /// Number of `ALIVE` cells.
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) out of range for {}x{} snapshot",
            self.height,
            self.width
        );
        row * self.width + col
    }
}

impl fmt::Display for WorldSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_is_row_major() {
        let snap = WorldSnapshot::from_rows(vec![
            vec![Cell::Dead, Cell::Alive],
            vec![Cell::Alive, Cell::Alive],
        ]);
        assert_eq!(snap.width(), 2);
        assert_eq!(snap.height(), 2);
        assert_eq!(snap.get(0, 1), Cell::Alive);
        assert_eq!(snap.row(1), &[Cell::Alive, Cell::Alive]);
        assert_eq!(snap.alive_count(), 3);
    }

    #[test]
    #[should_panic(expected = "row 1 has 1 cells")]
    fn ragged_rows_rejected() {
        let _ = WorldSnapshot::from_rows(vec![vec![Cell::Dead, Cell::Dead], vec![Cell::Dead]]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_get_panics() {
        let snap = WorldSnapshot::new(3, 3);
        let _ = snap.get(3, 0);
    }

    #[test]
    fn new_takes_height_then_width() {
        let snap = WorldSnapshot::new(2, 5);
        assert_eq!((snap.height(), snap.width()), (2, 5));
        assert_eq!(snap.rows().count(), 2);
        assert!(snap.rows().all(|row| row.len() == 5));
    }

    #[test]
    fn display_renders_one_line_per_row() {
        let mut snap = WorldSnapshot::new(2, 3);
        snap.set(1, 2, Cell::Alive);
        assert_eq!(snap.to_string(), "...\n..#\n");
    }
}
