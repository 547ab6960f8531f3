//! In-process transport: ranks are threads, mailboxes are channels.
//!
//! Each ordered pair of ranks gets one unbounded channel per [`Tag`], so
//! sends never block (the non-blocking send of the exchange protocol) and
//! a receive names exactly the mailbox it waits on. Abort is a shared
//! zero-capacity channel whose only sender is dropped on abort: every
//! endpoint `select!`s on it alongside its mailbox, so a blocked receive
//! wakes up instead of hanging.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use halo_core::{CommError, PhaseBarrier, RankId};

use crate::transport::{Tag, Transport};

type Mailbox = [Sender<Vec<u8>>; 2];
type Inbox = [Receiver<Vec<u8>>; 2];

/// State shared by every endpoint of one cluster.
struct Shared {
    barrier: PhaseBarrier,
    aborted: AtomicBool,
    /// Dropped on abort; disconnection is the wake-up signal.
    abort_tx: Mutex<Option<Sender<()>>>,
}

impl Shared {
    fn abort(&self, by: Option<RankId>) {
        if self.aborted.swap(true, Ordering::AcqRel) {
            return;
        }
        match by {
            Some(rank) => log::warn!("rank {rank} aborted the cluster"),
            None => log::warn!("cluster aborted"),
        }
        drop(
            self.abort_tx
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );
        self.barrier.poison();
    }
}

/// A group of `size` connected endpoints living in one process.
///
/// # Examples
///
/// ```
/// use halo_comm::{LocalCluster, Tag, Transport};
/// use halo_core::RankId;
///
/// let mut eps = LocalCluster::new(2).into_endpoints();
/// let b = eps.pop().unwrap();
/// let a = eps.pop().unwrap();
/// a.isend(RankId(1), Tag::Downward, vec![1, 0, 1]).unwrap();
/// assert_eq!(b.recv(RankId(0), Tag::Downward).unwrap(), vec![1, 0, 1]);
/// ```
pub struct LocalCluster {
    endpoints: Vec<LocalEndpoint>,
    shared: Arc<Shared>,
}

impl LocalCluster {
    /// Wire up `size` endpoints.
    ///
    /// # Panics
    ///
    /// Panics if `size == 0`.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "a cluster needs at least one rank");
        let (abort_tx, abort_rx) = bounded::<()>(0);
        let shared = Arc::new(Shared {
            barrier: PhaseBarrier::new(size),
            aborted: AtomicBool::new(false),
            abort_tx: Mutex::new(Some(abort_tx)),
        });

        let mut outboxes: Vec<Vec<Mailbox>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut inboxes: Vec<Vec<Inbox>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        for src in 0..size {
            for dst in 0..size {
                let (up_tx, up_rx) = unbounded();
                let (down_tx, down_rx) = unbounded();
                outboxes[src].push([up_tx, down_tx]);
                inboxes[dst].push([up_rx, down_rx]);
            }
        }

        let endpoints = outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outbox, inbox))| LocalEndpoint {
                rank: RankId(rank),
                outbox,
                inbox,
                abort_rx: abort_rx.clone(),
                shared: Arc::clone(&shared),
            })
            .collect();

        Self { endpoints, shared }
    }

    /// Number of ranks.
    pub fn size(&self) -> usize {
        self.endpoints.len()
    }

    /// A handle that can abort the cluster from outside any rank.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Hand out the endpoints, indexed by rank.
    pub fn into_endpoints(self) -> Vec<LocalEndpoint> {
        self.endpoints
    }
}

/// Aborts a [`LocalCluster`] from outside its ranks.
#[derive(Clone)]
pub struct AbortHandle {
    shared: Arc<Shared>,
}

impl AbortHandle {
    /// Abort the cluster. Idempotent.
    pub fn abort(&self) {
        self.shared.abort(None);
    }

    /// Whether the cluster has been aborted.
    pub fn is_aborted(&self) -> bool {
        self.shared.aborted.load(Ordering::Acquire)
    }
}

/// One rank's view of a [`LocalCluster`].
pub struct LocalEndpoint {
    rank: RankId,
    /// Indexed by destination rank, then tag.
    outbox: Vec<Mailbox>,
    /// Indexed by source rank, then tag.
    inbox: Vec<Inbox>,
    abort_rx: Receiver<()>,
    shared: Arc<Shared>,
}

impl LocalEndpoint {
    fn check_rank(&self, rank: RankId) -> Result<(), CommError> {
        if rank.0 < self.outbox.len() {
            Ok(())
        } else {
            Err(CommError::NoSuchRank {
                rank,
                size: self.outbox.len(),
            })
        }
    }

    fn is_aborted(&self) -> bool {
        self.shared.aborted.load(Ordering::Acquire)
    }
}

impl Drop for LocalEndpoint {
    fn drop(&mut self) {
        // A rank unwinding past its endpoint must not leave peers blocked
        // in the cluster barrier.
        if std::thread::panicking() {
            self.shared.abort(Some(self.rank));
        }
    }
}

impl fmt::Debug for LocalEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEndpoint")
            .field("rank", &self.rank)
            .field("size", &self.outbox.len())
            .finish()
    }
}

impl Transport for LocalEndpoint {
    fn rank(&self) -> RankId {
        self.rank
    }

    fn size(&self) -> usize {
        self.outbox.len()
    }

    fn isend(&self, dest: RankId, tag: Tag, payload: Vec<u8>) -> Result<(), CommError> {
        self.check_rank(dest)?;
        if self.is_aborted() {
            return Err(CommError::Aborted);
        }
        self.outbox[dest.0][tag.index()]
            .send(payload)
            .map_err(|_| CommError::Disconnected { peer: dest })
    }

    fn recv(&self, source: RankId, tag: Tag) -> Result<Vec<u8>, CommError> {
        self.check_rank(source)?;
        if self.is_aborted() {
            return Err(CommError::Aborted);
        }
        let mailbox = &self.inbox[source.0][tag.index()];
        select! {
            recv(mailbox) -> msg => msg.map_err(|_| CommError::Disconnected { peer: source }),
            recv(self.abort_rx) -> _ => Err(CommError::Aborted),
        }
    }

    fn barrier(&self) -> Result<(), CommError> {
        self.shared
            .barrier
            .wait()
            .map(|_| ())
            .map_err(|_| CommError::Aborted)
    }

    fn abort(&self) {
        self.shared.abort(Some(self.rank));
    }
}
