//! Core automaton logic: grid layout, cell buffers, the transition rule and
//! the parallel update kernel.

pub mod buffers;
pub mod grid;
pub mod rule;
pub mod stepping;

pub use buffers::GridBuffers;
pub use grid::{count_neighbors, Dimensions};
pub use rule::NeighborRule;
pub use stepping::{apply_generation, UpdateKernel};
