//! Strongly-typed identifiers.

use std::fmt;

/// Index of a cooperating rank in `[0, rank_count)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RankId(pub usize);

impl fmt::Display for RankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for RankId {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Index of a worker thread within a rank, in `[0, thread_count)`.
///
/// Thread 0 is the coordinator thread: it drives the halo exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadIndex(pub usize);

impl ThreadIndex {
    /// The thread that owns the exchange phase.
    pub const COORDINATOR: Self = Self(0);

    /// Whether this thread drives the halo exchange.
    pub fn is_coordinator(self) -> bool {
        self == Self::COORDINATOR
    }
}

impl fmt::Display for ThreadIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing tick counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of one independent random stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamIndex(pub usize);

impl fmt::Display for StreamIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for StreamIndex {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_thread_zero_coordinates() {
        assert!(ThreadIndex(0).is_coordinator());
        assert!(!ThreadIndex(1).is_coordinator());
    }

    #[test]
    fn ids_display_as_bare_integers() {
        assert_eq!(RankId(3).to_string(), "3");
        assert_eq!(TickId(42).to_string(), "42");
        assert_eq!(StreamIndex(7).to_string(), "7");
    }
}
