//! Voxel Conway - 3D cellular automaton engine
//!
//! A Game-of-Life style automaton on a bounded 3D grid with a 26-cell Moore
//! neighborhood. Generations are computed on a rayon worker pool through a
//! five-stage pipeline, and alive cells are counted by one of three parallel
//! reduction strategies (see [`counter`]).
//!
//! The Rust API is [`Simulation`]; [`ffi`] exposes the same surface as a C ABI
//! for embedding hosts such as LuaJIT FFI.

pub mod automaton;
pub mod bounds;
pub mod config;
pub mod counter;
pub mod error;
pub mod ffi;
pub mod jobs;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use automaton::{Dimensions, NeighborRule};
pub use bounds::Bounds;
pub use config::{SimulationConfig, TuningConfig, UpdateMode};
pub use counter::{AliveCounter, CounterKind};
pub use error::ConfigError;
pub use pipeline::{Simulation, Stage, Stats};
