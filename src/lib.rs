//! prism-forge: PRISM cultural intelligence benchmark dataset forge.
//!
//! This library provides the generation-and-assembly pipeline that turns
//! "N domains x M scenarios-per-domain" into a durable, deduplicated,
//! uniquely-identified benchmark dataset despite an unreliable,
//! non-deterministic content generator.

// Core modules
pub mod cli;
pub mod dataset;
pub mod domains;
pub mod error;
pub mod llm;
pub mod merge;
pub mod pipeline;
pub mod prompts;
pub mod store;
pub mod utils;

// Re-export commonly used error types
pub use error::{ConfigError, LlmError, StoreError};
