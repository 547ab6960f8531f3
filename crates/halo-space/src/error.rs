//! Partitioning errors.

use std::error::Error;
use std::fmt;

use halo_core::RankId;

/// Errors from splitting the grid across ranks or threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartitionError {
    /// The process group has no ranks.
    ZeroRanks,
    /// A rank has no worker threads.
    ZeroThreads,
    /// The grid has zero rows or zero columns.
    EmptyGrid,
    /// The grid height does not divide evenly across ranks
    /// (or there are more ranks than rows).
    UnevenRanks {
        /// Global grid height.
        height: usize,
        /// Number of ranks.
        ranks: usize,
    },
    /// A rank's band does not divide evenly across threads
    /// (or there are more threads than rows).
    UnevenThreads {
        /// Rows owned by each rank.
        rows_per_rank: usize,
        /// Number of worker threads.
        threads: usize,
    },
    /// A rank index outside `[0, ranks)`.
    RankOutOfRange {
        /// The requested rank.
        rank: RankId,
        /// Number of ranks.
        ranks: usize,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroRanks => write!(f, "rank count must be at least 1"),
            Self::ZeroThreads => write!(f, "thread count must be at least 1"),
            Self::EmptyGrid => write!(f, "grid must have at least one row and one column"),
            Self::UnevenRanks { height, ranks } => write!(
                f,
                "grid height {height} does not divide evenly across {ranks} ranks"
            ),
            Self::UnevenThreads {
                rows_per_rank,
                threads,
            } => write!(
                f,
                "{rows_per_rank} rows per rank do not divide evenly across {threads} threads"
            ),
            Self::RankOutOfRange { rank, ranks } => {
                write!(f, "rank {rank} out of range for {ranks} ranks")
            }
        }
    }
}

impl Error for PartitionError {}
