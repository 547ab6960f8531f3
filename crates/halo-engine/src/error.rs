//! Run-level error type.

use std::error::Error;
use std::fmt;

use halo_core::{CommError, RankId, ResourceError, ThreadIndex};

use crate::config::ConfigError;

/// Why a run stopped. Every variant is fatal; nothing is retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    /// Invalid parameters, detected before any simulation work.
    Config(ConfigError),
    /// A buffer or thread could not be obtained.
    Resource(ResourceError),
    /// A send, receive or cluster barrier failed.
    Comm(CommError),
    /// A rank thread panicked.
    RankPanicked {
        /// The rank whose thread panicked.
        rank: RankId,
    },
    /// A worker thread of a rank panicked.
    WorkerPanicked {
        /// The rank the worker belongs to.
        rank: RankId,
        /// The worker.
        thread: ThreadIndex,
    },
    /// A phase barrier of a rank was poisoned by another thread's failure.
    PhaseAborted {
        /// The rank whose barrier was poisoned.
        rank: RankId,
    },
}

impl RunError {
    /// Errors that are consequences of a failure elsewhere (an abort or a
    /// vanished peer) rather than a root cause.
    pub fn is_secondary(&self) -> bool {
        matches!(
            self,
            Self::Comm(CommError::Aborted)
                | Self::Comm(CommError::Disconnected { .. })
                | Self::PhaseAborted { .. }
        )
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration: {e}"),
            Self::Resource(e) => write!(f, "resource: {e}"),
            Self::Comm(e) => write!(f, "communication: {e}"),
            Self::RankPanicked { rank } => write!(f, "rank {rank} panicked"),
            Self::WorkerPanicked { rank, thread } => {
                write!(f, "worker thread {thread} of rank {rank} panicked")
            }
            Self::PhaseAborted { rank } => write!(f, "rank {rank} phase barrier aborted"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Resource(e) => Some(e),
            Self::Comm(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ResourceError> for RunError {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}

impl From<CommError> for RunError {
    fn from(e: CommError) -> Self {
        Self::Comm(e)
    }
}
