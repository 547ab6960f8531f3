//! One band-shaped grid with ghost rows.

use std::sync::atomic::{AtomicU8, Ordering};

use halo_core::{Cell, CommError, ResourceError};

/// A `rows × width` grid of cells shared between the threads of a rank.
///
/// `rows` includes the two ghost rows. Indices out of range are a
/// programming error and panic immediately.
#[derive(Debug)]
pub struct BandGrid {
    rows: usize,
    width: usize,
    cells: Box<[AtomicU8]>,
}

impl BandGrid {
    /// Allocate an all-dead grid.
    ///
    /// Returns `Err(ResourceError::AllocationFailed)` if the allocator
    /// refuses the request (or its size overflows).
    pub fn new(rows: usize, width: usize) -> Result<Self, ResourceError> {
        let len = rows
            .checked_mul(width)
            .ok_or(ResourceError::AllocationFailed { bytes: usize::MAX })?;
        let mut cells: Vec<AtomicU8> = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| ResourceError::AllocationFailed { bytes: len })?;
        cells.extend((0..len).map(|_| AtomicU8::new(Cell::Dead.to_raw())));
        Ok(Self {
            rows,
            width,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Rows including ghosts.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Read one cell.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        let raw = self.cells[self.index(row, col)].load(Ordering::Relaxed);
        // Only `set`/`write_raw_row` store here and both store valid cells.
        if raw == Cell::Alive.to_raw() {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }

    /// Write one cell.
    #[inline]
    pub fn set(&self, row: usize, col: usize, cell: Cell) {
        self.cells[self.index(row, col)].store(cell.to_raw(), Ordering::Relaxed);
    }

    /// Copy a row out as raw wire values.
    pub fn raw_row(&self, row: usize) -> Vec<u8> {
        self.row_slice(row)
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect()
    }

    /// Copy a row out as cells.
    pub fn row_cells(&self, row: usize) -> Vec<Cell> {
        (0..self.width).map(|c| self.get(row, c)).collect()
    }

    /// Overwrite a row from raw wire values.
    ///
    /// The whole payload is validated before anything is written, so a
    /// rejected message leaves the row untouched.
    pub fn write_raw_row(&self, row: usize, values: &[u8]) -> Result<(), CommError> {
        if values.len() != self.width {
            return Err(CommError::LengthMismatch {
                expected: self.width,
                actual: values.len(),
            });
        }
        if let Some(&bad) = values.iter().find(|&&v| Cell::from_raw(v).is_none()) {
            return Err(CommError::InvalidCell { value: bad });
        }
        for (dst, &v) in self.row_slice(row).iter().zip(values) {
            dst.store(v, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Overwrite a row from cells.
    ///
    /// # Panics
    ///
    /// Panics if `cells.len() != width`.
    pub fn write_row(&self, row: usize, cells: &[Cell]) {
        assert_eq!(cells.len(), self.width, "row length must equal grid width");
        for (dst, c) in self.row_slice(row).iter().zip(cells) {
            dst.store(c.to_raw(), Ordering::Relaxed);
        }
    }

    /// Copy row `src` onto row `dst` within this grid.
    pub fn copy_row(&self, src: usize, dst: usize) {
        let values = self.raw_row(src);
        for (d, v) in self.row_slice(dst).iter().zip(values) {
            d.store(v, Ordering::Relaxed);
        }
    }

    fn row_slice(&self, row: usize) -> &[AtomicU8] {
        assert!(row < self.rows, "row {row} out of range ({} rows)", self.rows);
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.width,
            "cell ({row}, {col}) out of range for {}x{} grid",
            self.rows,
            self.width
        );
        row * self.width + col
    }
}
