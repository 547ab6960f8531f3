//! Poisonable generation barrier.
//!
//! [`std::sync::Barrier`] cannot be cancelled: if one participant fails
//! before arriving, the rest wait forever. [`PhaseBarrier`] adds a
//! poison flag so that a failing participant (a coordinator thread whose
//! exchange failed, or a rank whose transport died) releases everyone
//! with an error instead.

use std::error::Error;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Returned by [`PhaseBarrier::wait`] once the barrier has been poisoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrierPoisoned;

impl fmt::Display for BarrierPoisoned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("barrier poisoned by a failed participant")
    }
}

impl Error for BarrierPoisoned {}

#[derive(Debug)]
struct State {
    arrived: usize,
    generation: u64,
    poisoned: bool,
}

/// A reusable barrier for a fixed number of participants.
///
/// Each call to [`wait`](PhaseBarrier::wait) blocks until `parties`
/// threads have arrived in the same generation. Everything a thread wrote
/// before arriving is visible to every thread after release (the state
/// mutex provides the happens-before edge).
#[derive(Debug)]
pub struct PhaseBarrier {
    parties: usize,
    state: Mutex<State>,
    cvar: Condvar,
}

// Compile-time assertion: PhaseBarrier must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<PhaseBarrier>();
};

impl PhaseBarrier {
    /// Create a barrier for `parties` participants.
    ///
    /// # Panics
    ///
    /// Panics if `parties == 0`.
    pub fn new(parties: usize) -> Self {
        assert!(parties > 0, "PhaseBarrier needs at least one participant");
        Self {
            parties,
            state: Mutex::new(State {
                arrived: 0,
                generation: 0,
                poisoned: false,
            }),
            cvar: Condvar::new(),
        }
    }

    /// Number of participants per generation.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Block until every participant has arrived.
    ///
    /// Returns `Ok(true)` for exactly one participant per generation (the
    /// last to arrive), `Ok(false)` for the rest, and
    /// `Err(BarrierPoisoned)` if the barrier is or becomes poisoned.
    pub fn wait(&self) -> Result<bool, BarrierPoisoned> {
        let mut state = self.lock();
        if state.poisoned {
            return Err(BarrierPoisoned);
        }
        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.cvar.notify_all();
            return Ok(true);
        }
        let generation = state.generation;
        while state.generation == generation && !state.poisoned {
            state = self
                .cvar
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.generation == generation {
            // Woken by poison, not by a full generation.
            Err(BarrierPoisoned)
        } else {
            Ok(false)
        }
    }

    /// Poison the barrier, releasing all current and future waiters.
    pub fn poison(&self) {
        let mut state = self.lock();
        state.poisoned = true;
        self.cvar.notify_all();
    }

    /// Whether [`poison`](PhaseBarrier::poison) has been called.
    pub fn is_poisoned(&self) -> bool {
        self.lock().poisoned
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
