//! Scripted random streams.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use halo_core::StreamIndex;
use halo_rng::RandomStreams;

/// Every draw on every stream returns the same value.
#[derive(Clone, Copy, Debug)]
pub struct FixedStreams {
    value: f64,
}

impl FixedStreams {
    pub fn new(value: f64) -> Self {
        assert!((0.0..1.0).contains(&value), "draws must lie in [0, 1)");
        Self { value }
    }
}

impl RandomStreams for FixedStreams {
    fn stream_count(&self) -> usize {
        usize::MAX
    }

    fn draw(&self, _stream: StreamIndex) -> f64 {
        self.value
    }
}

/// Each stream independently cycles through the same value sequence.
#[derive(Debug)]
pub struct CyclingStreams {
    values: Vec<f64>,
    cursors: Box<[AtomicUsize]>,
}

impl CyclingStreams {
    pub fn new(values: Vec<f64>, count: usize) -> Self {
        assert!(!values.is_empty(), "need at least one value");
        assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "draws must lie in [0, 1)"
        );
        Self {
            values,
            cursors: (0..count).map(|_| AtomicUsize::new(0)).collect(),
        }
    }
}

impl RandomStreams for CyclingStreams {
    fn stream_count(&self) -> usize {
        self.cursors.len()
    }

    fn draw(&self, stream: StreamIndex) -> f64 {
        let i = self.cursors[stream.0].fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()]
    }
}

/// Wraps another bank and counts draws per stream.
#[derive(Debug)]
pub struct CountingStreams<S> {
    inner: S,
    counts: Box<[AtomicU64]>,
}

impl<S: RandomStreams> CountingStreams<S> {
    /// Count draws on streams `0..count` of `inner`.
    pub fn new(inner: S, count: usize) -> Self {
        Self {
            inner,
            counts: (0..count).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    pub fn draws(&self, stream: StreamIndex) -> u64 {
        self.counts[stream.0].load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }
}

impl<S: RandomStreams> RandomStreams for CountingStreams<S> {
    fn stream_count(&self) -> usize {
        self.counts.len().min(self.inner.stream_count())
    }

    fn draw(&self, stream: StreamIndex) -> f64 {
        assert!(
            stream.0 < self.counts.len(),
            "stream {stream} out of range ({} streams)",
            self.counts.len()
        );
        self.counts[stream.0].fetch_add(1, Ordering::Relaxed);
        self.inner.draw(stream)
    }
}
