//! Engine configuration.
//!
//! [`SimulationConfig`] is fixed at construction. [`TuningConfig`] can be
//! replaced at runtime through `Simulation::set_tuning`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::automaton::{Dimensions, NeighborRule};
use crate::counter::CounterKind;
use crate::error::ConfigError;

/// Cells per reduction partition when no chunk is configured: the grid is
/// split into this many partitions.
pub const DEFAULT_PARTITIONS: usize = 256;

/// How the pipeline advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// All stages of a generation run back to back in one tick.
    Immediate,
    /// One stage per tick.
    #[default]
    Deferred,
}

/// Construction-time configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Each cell starts alive with probability `1 / spawn_probability`.
    pub spawn_probability: u32,
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    /// Cells per reduction partition; `None` picks [`default_chunk`].
    pub chunk: Option<usize>,
    pub counter: CounterKind,
    pub mode: UpdateMode,
    /// Worker threads; 0 uses rayon's default.
    pub threads: usize,
    pub tuning: TuningConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed: 0,
            spawn_probability: 8,
            width: 128,
            height: 128,
            depth: 1,
            chunk: None,
            counter: CounterKind::default(),
            mode: UpdateMode::default(),
            threads: 0,
            tuning: TuningConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Default configuration for a grid of the given size.
    pub fn with_dimensions(width: usize, height: usize, depth: usize) -> Self {
        SimulationConfig {
            width,
            height,
            depth,
            ..Default::default()
        }
    }

    /// Check every field and return the grid dimensions and effective chunk.
    pub fn validate(&self) -> Result<(Dimensions, usize), ConfigError> {
        let dims = Dimensions::new(self.width, self.height, self.depth)?;
        if self.spawn_probability == 0 {
            return Err(ConfigError::ZeroSpawnProbability);
        }
        let chunk = match self.chunk {
            Some(0) => return Err(ConfigError::ZeroChunk),
            Some(chunk) => chunk,
            None => default_chunk(dims.cell_count()),
        };
        self.tuning.validate()?;
        Ok((dims, chunk))
    }
}

/// `cell_count / 256`, at least 1.
pub fn default_chunk(cell_count: usize) -> usize {
    (cell_count / DEFAULT_PARTITIONS).max(1)
}

/// Runtime-mutable tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Minimum time between generations.
    pub tick_interval: Duration,
    pub rule: NeighborRule,
    /// Edge length of one rendered cell.
    pub cell_size: f32,
    /// Gap between rendered cells.
    pub spacing: f32,
    /// Passed through to rendering hosts.
    pub can_render: bool,
}

impl Default for TuningConfig {
    fn default() -> Self {
        TuningConfig {
            tick_interval: Duration::from_millis(15),
            rule: NeighborRule::conway(),
            cell_size: 1.0,
            spacing: 0.1,
            can_render: true,
        }
    }
}

impl TuningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rule.validate()
    }
}
