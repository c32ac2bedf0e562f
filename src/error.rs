//! Error types for engine construction and runtime tuning.

use thiserror::Error;

/// Largest neighbor count a cell can see in the 26-neighbor Moore neighborhood.
pub const MAX_NEIGHBORS: u8 = 26;

/// Configuration errors. Construction fails as a whole when any of these is
/// returned; no partially built engine is ever handed out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One of the grid axes is zero.
    #[error("grid dimensions must be >= 1 on every axis (got {width}x{height}x{depth})")]
    ZeroDimension {
        width: usize,
        height: usize,
        depth: usize,
    },

    /// `width * height * depth` does not fit in `usize`.
    #[error("grid {width}x{height}x{depth} overflows the addressable cell count")]
    CellCountOverflow {
        width: usize,
        height: usize,
        depth: usize,
    },

    /// Reduction chunk size is zero.
    #[error("reduction chunk size must be >= 1")]
    ZeroChunk,

    /// Spawn probability denominator is zero.
    #[error("spawn probability must be >= 1")]
    ZeroSpawnProbability,

    /// A birth or survival threshold is outside `[0, 26]`.
    #[error("{name} threshold {value} is outside [0, {MAX_NEIGHBORS}]")]
    ThresholdOutOfRange { name: &'static str, value: u8 },

    /// An explicit initial state does not cover the grid exactly.
    #[error("initial state has {got} cells, grid needs {expected}")]
    CellCountMismatch { expected: usize, got: usize },

    /// The worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl From<rayon::ThreadPoolBuildError> for ConfigError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        ConfigError::ThreadPool(err.to_string())
    }
}
