//! Error types shared across the Halo workspace.
//!
//! Configuration errors live next to the configuration they validate
//! (`halo-space`, `halo-engine`). The two classes here are raised by
//! several crates: resource exhaustion while allocating buffers or
//! threads, and transport failures between ranks.

use std::error::Error;
use std::fmt;

use crate::id::RankId;

/// A buffer or thread could not be obtained. Fatal for the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceError {
    /// Grid buffer allocation failed.
    AllocationFailed {
        /// Number of bytes requested.
        bytes: usize,
    },
    /// A worker or rank thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed and why.
        reason: String,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { bytes } => {
                write!(f, "grid allocation of {bytes} bytes failed")
            }
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ResourceError {}

/// A point-to-point send or receive failed. Fatal for the run: the
/// lockstep exchange has no way to resume a partial transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommError {
    /// The peer's endpoint is gone.
    Disconnected {
        /// The rank that can no longer be reached.
        peer: RankId,
    },
    /// The cluster was aborted by another rank.
    Aborted,
    /// A message did not carry exactly one row.
    LengthMismatch {
        /// Expected number of values (the grid width).
        expected: usize,
        /// Number of values received.
        actual: usize,
    },
    /// A message carried a value that is not a valid cell.
    InvalidCell {
        /// The offending raw value.
        value: u8,
    },
    /// A message was addressed to a rank outside the group.
    NoSuchRank {
        /// The requested rank.
        rank: RankId,
        /// Size of the process group.
        size: usize,
    },
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { peer } => write!(f, "rank {peer} disconnected"),
            Self::Aborted => write!(f, "cluster aborted"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "halo row carries {actual} values, expected {expected}")
            }
            Self::InvalidCell { value } => write!(f, "invalid cell value {value} in halo row"),
            Self::NoSuchRank { rank, size } => {
                write!(f, "rank {rank} outside process group of size {size}")
            }
        }
    }
}

impl Error for CommError {}
