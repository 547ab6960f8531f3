//! Toroidal column arithmetic.
//!
//! Columns wrap modulo the grid width. Rows never wrap locally: the ghost
//! rows carry the neighbouring band, so row wraparound is transitive
//! through the ring.

/// Resolve `col + delta` on a ring of `len` columns.
#[inline]
pub fn wrap_column(col: usize, delta: isize, len: usize) -> usize {
    debug_assert!(len > 0 && col < len);
    let len = len as isize;
    (((col as isize + delta) % len + len) % len) as usize
}

/// The three columns `[col - 1, col, col + 1]` of a 3×3 neighbourhood,
/// wrapped.
#[inline]
pub fn column_window(col: usize, width: usize) -> [usize; 3] {
    [
        wrap_column(col, -1, width),
        col,
        wrap_column(col, 1, width),
    ]
}
