//! C ABI for embedding hosts (LuaJIT FFI and similar).
//!
//! Every function is `#[no_mangle] extern "C"` and tolerates null handles.
//! The logic lives in [`crate::pipeline`]; these are thin wrappers doing null
//! checks and C-to-Rust conversions.

pub mod lifecycle;
pub mod simulation;

pub use lifecycle::{vc_create, vc_destroy};
pub use simulation::{
    vc_get_alive_count, vc_get_bounds, vc_get_cell_count, vc_get_generation, vc_get_stage,
    vc_get_states, vc_is_view_dirty, vc_set_rule, vc_set_tick_interval, vc_tick,
};
