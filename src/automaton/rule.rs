//! Generalized Conway transition rule.
//!
//! Birth needs an exact neighbor count, survival needs a count inside an
//! inclusive range. `NeighborRule::conway()` (B3/S23) collapses to classic
//! 2D Life on a grid of depth 1, since the z-neighbors are always out of range.

use serde::{Deserialize, Serialize};

use super::grid::{count_neighbors, Dimensions};
use crate::error::{ConfigError, MAX_NEIGHBORS};

/// Birth/survival thresholds over the 26-neighbor Moore neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborRule {
    /// A dead cell with exactly this many alive neighbors is born.
    pub birth_count: u8,
    /// An alive cell with fewer alive neighbors than this dies.
    pub min_population_cutoff: u8,
    /// An alive cell with more alive neighbors than this dies.
    pub max_population_threshold: u8,
}

impl Default for NeighborRule {
    fn default() -> Self {
        Self::conway()
    }
}

impl NeighborRule {
    /// Build a rule, rejecting thresholds outside `[0, 26]`.
    pub fn new(
        birth_count: u8,
        min_population_cutoff: u8,
        max_population_threshold: u8,
    ) -> Result<Self, ConfigError> {
        let rule = NeighborRule {
            birth_count,
            min_population_cutoff,
            max_population_threshold,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// B3/S23.
    pub const fn conway() -> Self {
        NeighborRule {
            birth_count: 3,
            min_population_cutoff: 2,
            max_population_threshold: 3,
        }
    }

    /// Check every threshold lies in `[0, 26]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("birth", self.birth_count),
            ("min population", self.min_population_cutoff),
            ("max population", self.max_population_threshold),
        ] {
            if value > MAX_NEIGHBORS {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// True when no neighbor count lets an alive cell survive.
    pub fn survival_impossible(&self) -> bool {
        self.min_population_cutoff > self.max_population_threshold
    }

    /// Next state of a cell given its current state and alive neighbor count.
    #[inline]
    pub fn next_state(&self, alive: u8, neighbors: u8) -> u8 {
        let survives = if alive != 0 {
            neighbors >= self.min_population_cutoff && neighbors <= self.max_population_threshold
        } else {
            neighbors == self.birth_count
        };
        u8::from(survives)
    }

    /// Evaluate the rule for one cell against a read-only snapshot.
    ///
    /// Reads only `previous`; safe to call for every index concurrently.
    #[inline]
    pub fn evaluate(&self, dims: &Dimensions, previous: &[u8], index: usize) -> u8 {
        let (x, y, z) = dims.coords_of(index);
        let neighbors = count_neighbors(dims, previous, x, y, z);
        self.next_state(previous[index], neighbors)
    }
}
