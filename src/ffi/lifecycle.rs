//! Simulation creation and destruction.

use std::ptr;

use tracing::warn;

use crate::config::{SimulationConfig, UpdateMode};
use crate::counter::CounterKind;
use crate::pipeline::Simulation;

/// Maps a strategy code to a counter: 0 linear, 1 binary tree,
/// 2 parallel binary tree.
pub fn counter_from_code(strategy: u32) -> Option<CounterKind> {
    match strategy {
        0 => Some(CounterKind::Linear),
        1 => Some(CounterKind::BinaryTree),
        2 => Some(CounterKind::ParallelBinaryTree),
        _ => None,
    }
}

/// Creates a simulation and returns an opaque pointer.
///
/// `chunk == 0` selects the default partition size. `deferred != 0` advances
/// one pipeline stage per tick.
///
/// # Returns
/// A pointer to a new Simulation, or null if the configuration is rejected.
///
/// # Safety
/// The returned pointer must eventually be freed with `vc_destroy()`.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn vc_create(
    width: u32,
    height: u32,
    depth: u32,
    seed: u64,
    spawn_probability: u32,
    chunk: u32,
    strategy: u32,
    deferred: u8,
) -> *mut Simulation {
    let Some(counter) = counter_from_code(strategy) else {
        warn!(strategy, "unknown counter strategy");
        return ptr::null_mut();
    };
    let config = SimulationConfig {
        seed,
        spawn_probability,
        width: width as usize,
        height: height as usize,
        depth: depth as usize,
        chunk: (chunk != 0).then_some(chunk as usize),
        counter,
        mode: if deferred != 0 {
            UpdateMode::Deferred
        } else {
            UpdateMode::Immediate
        },
        ..SimulationConfig::default()
    };

    match Simulation::new(config) {
        Ok(simulation) => Box::into_raw(Box::new(simulation)),
        Err(err) => {
            warn!(%err, "simulation rejected");
            ptr::null_mut()
        }
    }
}

/// Destroys a simulation, waiting for any work still in flight.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `vc_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn vc_destroy(ptr: *mut Simulation) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}
