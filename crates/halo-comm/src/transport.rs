//! The transport contract.

use halo_core::{CommError, RankId};

/// Message tag. Messages between the same pair of ranks match in send
/// order per tag.
///
/// The halo exchange uses one tag per direction so that a two-rank ring,
/// where predecessor and successor are the same rank, still pairs each
/// ghost row with the correct boundary row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// A rank's top row travelling to its ring predecessor.
    Upward,
    /// A rank's bottom row travelling to its ring successor.
    Downward,
}

impl Tag {
    /// Mailbox slot of this tag.
    pub fn index(self) -> usize {
        match self {
            Tag::Upward => 0,
            Tag::Downward => 1,
        }
    }
}

/// Point-to-point messaging within a fixed process group.
pub trait Transport: Send {
    /// This endpoint's rank.
    fn rank(&self) -> RankId;

    /// Number of ranks in the group.
    fn size(&self) -> usize;

    /// Queue `payload` for `dest` and return without waiting for the
    /// matching receive.
    fn isend(&self, dest: RankId, tag: Tag, payload: Vec<u8>) -> Result<(), CommError>;

    /// Block until the next message from `source` with `tag` arrives.
    fn recv(&self, source: RankId, tag: Tag) -> Result<Vec<u8>, CommError>;

    /// Block until every rank of the group has called `barrier`.
    fn barrier(&self) -> Result<(), CommError>;

    /// Abort the whole group. Pending and future receives and barriers on
    /// every endpoint fail with [`CommError::Aborted`].
    fn abort(&self);
}
