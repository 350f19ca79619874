//! CLI functionality for the carebridge binary
//!
//! This module contains the two subcommands:
//! - `serve`: run the HTTP API
//! - `migrate`: create missing tables and exit

#[cfg(feature = "cli")]
pub mod migrate;
#[cfg(feature = "cli")]
pub mod serve;
