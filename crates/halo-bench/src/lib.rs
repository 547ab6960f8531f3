//! Benchmark profiles for the Halo cellular automaton.
//!
//! - [`reference_profile`]: 256x256 grid, 2 ranks x 2 threads
//! - [`stress_profile`]: 1024x1024 grid, 4 ranks x 4 threads

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use halo_engine::{SimConfig, StreamKeying};

/// A 256x256 grid for 2 ranks of 2 threads, 20% gating.
///
/// Returns the config and its rank count.
pub fn reference_profile(seed: u64, ticks: u64) -> (SimConfig, usize) {
    let mut config = SimConfig::new(2, 256, 256, ticks, 20);
    config.seed = seed;
    config.stream_keying = StreamKeying::GlobalRow;
    (config, 2)
}

/// A 1024x1024 grid for 4 ranks of 4 threads, 20% gating.
pub fn stress_profile(seed: u64, ticks: u64) -> (SimConfig, usize) {
    let mut config = SimConfig::new(4, 1024, 1024, ticks, 20);
    config.seed = seed;
    config.stream_keying = StreamKeying::GlobalRow;
    (config, 4)
}
