//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod classify;
mod config_gen;
mod resolve;

pub use classify::*;
pub use config_gen::*;
pub use resolve::*;
