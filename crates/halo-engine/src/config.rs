//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] is built once at startup and passed by reference to
//! every component. [`validate()`](SimConfig::validate) checks every
//! divisibility and range requirement before any buffer is allocated, so
//! an uneven split is reported instead of silently truncating bands.

use std::error::Error;
use std::fmt;

use halo_core::RankId;
use halo_rng::DEFAULT_STREAM_COUNT;
use halo_space::{PartitionError, RankLayout, ThreadBands};

// ── StreamKeying ───────────────────────────────────────────────────

/// Which row identity keys a cell's random stream during compute.
///
/// See [`RowStreamPolicy`](crate::policy::RowStreamPolicy).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamKeying {
    /// Stream = local row offset within the rank's band. Ranks reuse the
    /// same streams for rows at the same offset.
    #[default]
    LocalOffset,
    /// Stream = global row. Results are independent of the decomposition.
    GlobalRow,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The grid does not split evenly across ranks or threads.
    Partition(PartitionError),
    /// `threshold_percent` exceeds 100.
    ThresholdOutOfRange {
        /// The configured percentage.
        percent: u32,
    },
    /// Fewer random streams than global rows.
    StreamsExhausted {
        /// Streams needed (one per global row).
        required: usize,
        /// Streams available.
        available: usize,
    },
    /// An explicit initial pattern does not match the grid shape.
    PatternShape {
        /// Configured `(height, width)`.
        expected: (usize, usize),
        /// Pattern `(height, width)`.
        actual: (usize, usize),
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Partition(e) => write!(f, "partition: {e}"),
            Self::ThresholdOutOfRange { percent } => {
                write!(f, "threshold must be between 0 and 100 percent, got {percent}")
            }
            Self::StreamsExhausted {
                required,
                available,
            } => write!(
                f,
                "{required} random streams required (one per grid row), only {available} available"
            ),
            Self::PatternShape { expected, actual } => write!(
                f,
                "initial pattern is {}x{}, grid is {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Partition(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PartitionError> for ConfigError {
    fn from(e: PartitionError) -> Self {
        Self::Partition(e)
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Immutable simulation parameters.
///
/// The rank count is not part of the configuration: it comes from the
/// process group the simulation runs in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Worker threads per rank.
    pub threads: usize,
    /// Grid columns.
    pub width: usize,
    /// Grid rows (global).
    pub height: usize,
    /// Number of ticks to run.
    pub ticks: u64,
    /// Gating threshold as an integer percentage, 0..=100.
    pub threshold_percent: u32,
    /// Seed for the random stream bank.
    pub seed: u64,
    /// Streams per rank's bank. Must be at least `height`.
    pub stream_count: usize,
    /// Row-to-stream mapping used during compute.
    pub stream_keying: StreamKeying,
}

impl SimConfig {
    /// Configuration with default seed, stream count and keying.
    pub fn new(
        threads: usize,
        width: usize,
        height: usize,
        ticks: u64,
        threshold_percent: u32,
    ) -> Self {
        Self {
            threads,
            width,
            height,
            ticks,
            threshold_percent,
            seed: 0,
            stream_count: DEFAULT_STREAM_COUNT,
            stream_keying: StreamKeying::default(),
        }
    }

    /// The gating threshold as a fraction in `[0, 1]`.
    pub fn threshold(&self) -> f64 {
        f64::from(self.threshold_percent) / 100.0
    }

    /// Check every requirement for running on `ranks` ranks.
    pub fn validate(&self, ranks: usize) -> Result<(), ConfigError> {
        if self.threshold_percent > 100 {
            return Err(ConfigError::ThresholdOutOfRange {
                percent: self.threshold_percent,
            });
        }
        let layout = self.layout(ranks, RankId(0))?;
        self.thread_bands(&layout)?;
        // The initial fill keys streams by global row on every rank.
        if self.stream_count < self.height {
            return Err(ConfigError::StreamsExhausted {
                required: self.height,
                available: self.stream_count,
            });
        }
        Ok(())
    }

    /// Layout of `rank` among `ranks` ranks.
    pub fn layout(&self, ranks: usize, rank: RankId) -> Result<RankLayout, ConfigError> {
        Ok(RankLayout::new(self.height, self.width, ranks, rank)?)
    }

    /// Thread row assignment within `layout`'s band.
    pub fn thread_bands(&self, layout: &RankLayout) -> Result<ThreadBands, ConfigError> {
        Ok(ThreadBands::new(layout.rows_per_rank(), self.threads)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_percent_over_hundred() {
        assert_eq!(SimConfig::new(1, 4, 4, 1, 25).threshold(), 0.25);
        assert_eq!(SimConfig::new(1, 4, 4, 1, 0).threshold(), 0.0);
        assert_eq!(SimConfig::new(1, 4, 4, 1, 100).threshold(), 1.0);
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(SimConfig::new(2, 16, 16, 10, 25).validate(4), Ok(()));
    }

    #[test]
    fn uneven_rank_split_rejected() {
        let err = SimConfig::new(1, 8, 10, 1, 0).validate(3).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Partition(PartitionError::UnevenRanks {
                height: 10,
                ranks: 3
            })
        );
    }

    #[test]
    fn uneven_thread_split_rejected() {
        let err = SimConfig::new(3, 8, 8, 1, 0).validate(2).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Partition(PartitionError::UnevenThreads {
                rows_per_rank: 4,
                threads: 3
            })
        );
    }

    #[test]
    fn zero_sizes_rejected() {
        assert!(SimConfig::new(0, 8, 8, 1, 0).validate(1).is_err());
        assert!(SimConfig::new(1, 0, 8, 1, 0).validate(1).is_err());
        assert!(SimConfig::new(1, 8, 0, 1, 0).validate(1).is_err());
        assert!(SimConfig::new(1, 8, 8, 1, 0).validate(0).is_err());
    }

    #[test]
    fn threshold_above_hundred_rejected() {
        assert_eq!(
            SimConfig::new(1, 4, 4, 1, 101).validate(1),
            Err(ConfigError::ThresholdOutOfRange { percent: 101 })
        );
    }

    #[test]
    fn too_few_streams_rejected() {
        let mut cfg = SimConfig::new(1, 4, 32, 1, 0);
        cfg.stream_count = 16;
        assert_eq!(
            cfg.validate(2),
            Err(ConfigError::StreamsExhausted {
                required: 32,
                available: 16
            })
        );
    }

    #[test]
    fn partition_error_is_the_source() {
        let err = SimConfig::new(1, 8, 10, 1, 0).validate(3).unwrap_err();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("partition: "));
    }
}
