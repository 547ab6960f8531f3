//! Reproducible indexed streams.
//!
//! Respects the determinism contract: stream `i` of a bank seeded with
//! `seed` is a ChaCha8 generator seeded from `seed` and switched to
//! ChaCha stream `i`, so the same `(seed, index, call count)` always
//! yields the same value, independent of which thread draws it or of how
//! draws on other streams interleave.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use halo_core::{ResourceError, StreamIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of streams a default bank provides. At least the number of
/// global rows any run may use.
pub const DEFAULT_STREAM_COUNT: usize = 16_384;

/// Many independent, deterministic streams of uniform values in `[0, 1)`.
///
/// Shared by reference between the worker threads of a rank; each call
/// advances only the stream it names.
pub trait RandomStreams: Send + Sync {
    /// Number of streams available; valid indices are `0..stream_count()`.
    fn stream_count(&self) -> usize;

    /// Next uniform value in `[0, 1)` from `stream`.
    ///
    /// # Panics
    ///
    /// Implementations panic if `stream` is out of range.
    fn draw(&self, stream: StreamIndex) -> f64;
}

/// ChaCha8-backed stream bank.
///
/// Each stream sits behind its own mutex. Within a rank every row is
/// processed by exactly one thread, so the locks are uncontended; they
/// exist so that any row-to-stream policy is sound.
pub struct ChaChaStreams {
    seed: u64,
    streams: Box<[Mutex<ChaCha8Rng>]>,
}

impl ChaChaStreams {
    /// A bank of [`DEFAULT_STREAM_COUNT`] streams.
    pub fn new(seed: u64) -> Result<Self, ResourceError> {
        Self::with_count(seed, DEFAULT_STREAM_COUNT)
    }

    /// A bank of `count` streams.
    ///
    /// Returns `Err(ResourceError::AllocationFailed)` if the bank cannot
    /// be allocated.
    pub fn with_count(seed: u64, count: usize) -> Result<Self, ResourceError> {
        let mut streams = Vec::new();
        streams
            .try_reserve_exact(count)
            .map_err(|_| ResourceError::AllocationFailed {
                bytes: count.saturating_mul(std::mem::size_of::<Mutex<ChaCha8Rng>>()),
            })?;
        streams.extend((0..count).map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(i as u64);
            Mutex::new(rng)
        }));
        Ok(Self {
            seed,
            streams: streams.into_boxed_slice(),
        })
    }

    /// The seed every stream was derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl fmt::Debug for ChaChaStreams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaChaStreams")
            .field("seed", &self.seed)
            .field("streams", &self.streams.len())
            .finish()
    }
}

impl RandomStreams for ChaChaStreams {
    fn stream_count(&self) -> usize {
        self.streams.len()
    }

    fn draw(&self, stream: StreamIndex) -> f64 {
        assert!(
            stream.0 < self.streams.len(),
            "stream {stream} out of range ({} streams)",
            self.streams.len()
        );
        let mut rng = self.streams[stream.0]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        rng.random::<f64>()
    }
}
