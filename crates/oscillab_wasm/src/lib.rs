//! WASM bridge for `oscillab_core`.
//!
//! Requests arrive as plain JS objects in the same shape as the core's serde
//! types; results go back as plain objects. Core errors are returned as
//! `"<code>: <message>"` strings.

mod shared;
mod simulation;
mod sweep;

pub use simulation::{compare_simulations, list_equations, list_methods, run_simulation};
pub use sweep::{run_sweep, WasmSweepRunner};
