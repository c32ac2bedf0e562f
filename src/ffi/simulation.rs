//! Ticking, tuning, and queries on a live simulation.

use std::time::Duration;

use crate::automaton::NeighborRule;
use crate::pipeline::Simulation;

/// Advances the simulation by one host tick of `delta_seconds`.
/// Negative or non-finite deltas count as zero.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// 0 on success, -1 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn vc_tick(ptr: *mut Simulation, delta_seconds: f64) -> i32 {
    if ptr.is_null() {
        return -1;
    }

    let simulation = &mut *ptr;
    let delta = Duration::try_from_secs_f64(delta_seconds).unwrap_or(Duration::ZERO);
    simulation.tick(delta);
    0
}

/// Replaces the neighbor rule. Takes effect from the next scheduled update.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// 0 on success, 1 if a threshold is above 26, -1 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn vc_set_rule(ptr: *mut Simulation, birth: u8, min: u8, max: u8) -> i32 {
    if ptr.is_null() {
        return -1;
    }

    let simulation = &mut *ptr;
    let rule = NeighborRule {
        birth_count: birth,
        min_population_cutoff: min,
        max_population_threshold: max,
    };
    match simulation.set_rule(rule) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Sets the minimum time between generations.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// 0 on success, 1 if `seconds` is negative or not finite, -1 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn vc_set_tick_interval(ptr: *mut Simulation, seconds: f64) -> i32 {
    if ptr.is_null() {
        return -1;
    }

    match Duration::try_from_secs_f64(seconds) {
        Ok(interval) => {
            (*ptr).set_tick_interval(interval);
            0
        }
        Err(_) => 1,
    }
}

/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// The number of scheduled updates, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn vc_get_generation(ptr: *const Simulation) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).generation_count()
}

/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// The last published alive count, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn vc_get_alive_count(ptr: *const Simulation) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).alive_cells_count() as u64
}

/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
#[no_mangle]
pub unsafe extern "C" fn vc_get_cell_count(ptr: *const Simulation) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).cell_count() as u64
}

/// 1 if the last tick produced a new generation, else 0.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
#[no_mangle]
pub unsafe extern "C" fn vc_is_view_dirty(ptr: *const Simulation) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    u8::from((*ptr).view_dirty())
}

/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// The pipeline stage code (0 idle through 5 schedule count), or -1 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn vc_get_stage(ptr: *const Simulation) -> i32 {
    if ptr.is_null() {
        return -1;
    }
    i32::from((*ptr).stage().code())
}

/// Borrows the settled cell states, one byte per cell, x fastest.
///
/// The pointer stays valid until the next call that takes the simulation
/// mutably (`vc_tick`, `vc_destroy`).
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
/// - `out_len` must be a valid pointer to a u64, or null
///
/// # Returns
/// The state buffer, or null if ptr is null. `*out_len` receives its length
/// (0 if ptr is null).
#[no_mangle]
pub unsafe extern "C" fn vc_get_states(ptr: *const Simulation, out_len: *mut u64) -> *const u8 {
    if ptr.is_null() {
        if !out_len.is_null() {
            *out_len = 0;
        }
        return std::ptr::null();
    }

    let states = (*ptr).states();
    if !out_len.is_null() {
        *out_len = states.len() as u64;
    }
    states.as_ptr()
}

/// Writes the rendered extent as `[size_x, size_y, size_z, center_x, center_y, center_z]`.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
/// - `out` must point to at least 6 writable floats, or be null
///
/// # Returns
/// 0 on success, -1 if either pointer is null.
#[no_mangle]
pub unsafe extern "C" fn vc_get_bounds(ptr: *const Simulation, out: *mut f32) -> i32 {
    if ptr.is_null() || out.is_null() {
        return -1;
    }

    let bounds = (*ptr).bounds();
    let out = std::slice::from_raw_parts_mut(out, 6);
    out[..3].copy_from_slice(&bounds.size);
    out[3..].copy_from_slice(&bounds.center);
    0
}
