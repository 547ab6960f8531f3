//! Row assignment of a rank's band across worker threads.

use std::ops::Range;

use halo_core::ThreadIndex;

use crate::error::PartitionError;

/// Splits the `rows_per_rank` owned rows of a band into `threads`
/// contiguous, equally sized sub-bands.
///
/// Thread `t` handles local rows `[1 + t*band, 1 + (t+1)*band)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThreadBands {
    threads: usize,
    band: usize,
}

impl ThreadBands {
    /// Split `rows_per_rank` rows across `threads` threads.
    ///
    /// Returns `ZeroThreads` for `threads == 0` and `UnevenThreads` when
    /// the split is not exact (including more threads than rows).
    pub fn new(rows_per_rank: usize, threads: usize) -> Result<Self, PartitionError> {
        if threads == 0 {
            return Err(PartitionError::ZeroThreads);
        }
        if rows_per_rank % threads != 0 || rows_per_rank < threads {
            return Err(PartitionError::UnevenThreads {
                rows_per_rank,
                threads,
            });
        }
        Ok(Self {
            threads,
            band: rows_per_rank / threads,
        })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Rows per thread.
    pub fn band_len(&self) -> usize {
        self.band
    }

    /// Local rows processed by `thread`.
    ///
    /// # Panics
    ///
    /// Panics if `thread` is out of range.
    pub fn rows_for(&self, thread: ThreadIndex) -> Range<usize> {
        assert!(
            thread.0 < self.threads,
            "thread {thread} out of range for {} threads",
            self.threads
        );
        let start = 1 + thread.0 * self.band;
        start..start + self.band
    }

    /// `(thread, rows)` for every thread in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ThreadIndex, Range<usize>)> + '_ {
        (0..self.threads).map(move |t| (ThreadIndex(t), self.rows_for(ThreadIndex(t))))
    }
}
