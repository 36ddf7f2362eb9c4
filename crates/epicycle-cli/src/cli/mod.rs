//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `trace` - Run the engine headless and write the traced trail
//! - `coeffs` - Dump every harmonic's amplitude and phase
//! - `benchmark` - Measure setup and per-tick costs
//! - `recipe` - Drive a trace run from a YAML file

pub mod common;
pub mod trace;
pub mod coeffs;
pub mod benchmark;
pub mod recipe;

pub use trace::cmd_trace;
pub use coeffs::cmd_coeffs;
pub use benchmark::cmd_benchmark;
pub use recipe::cmd_recipe;
