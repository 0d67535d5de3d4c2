//! The generation-and-assembly pipeline.
//!
//! [`generator::BatchGenerator`] turns one domain into a batch of
//! normalized records, [`retry::ShortfallRetry`] tops up short batches
//! with a single bounded retry, and [`orchestrator::RunOrchestrator`]
//! drives the configured domain list sequentially, appending each
//! domain's records to the output store before moving on.

pub mod generator;
pub mod orchestrator;
pub mod retry;

pub use generator::BatchGenerator;
pub use orchestrator::{PipelineError, RunConfig, RunOrchestrator, RunStats};
pub use retry::{RetryPolicy, ShortfallRetry};
