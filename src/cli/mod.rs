//! Command-line interface for prism-forge.
//!
//! Provides commands for dataset generation, merging completed runs,
//! and inspecting record stores.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli};
