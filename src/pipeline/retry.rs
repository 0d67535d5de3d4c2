//! Bounded retry for short batches.
//!
//! When a batch comes back smaller than the target, the policy waits a
//! fixed backoff and asks the generator once more, keeping every record
//! from the first attempt and taking only as many from the retry as the
//! target still needs. Top-up records are renumbered by their position
//! in the combined sequence, not their position in the retry batch.

use std::time::Duration;

use tracing::{info, warn};

use crate::dataset::ScenarioRecord;
use crate::domains::Domain;

use super::generator::BatchGenerator;

/// Bounded retry-with-backoff policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first.
    pub max_attempts: u32,
    /// Pause before each retry attempt.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        // One retry after a short pause; never unbounded backoff.
        Self {
            max_attempts: 2,
            backoff: Duration::from_secs(15),
        }
    }
}

/// Wraps a [`BatchGenerator`] with the shortfall top-up policy.
pub struct ShortfallRetry {
    generator: BatchGenerator,
    policy: RetryPolicy,
}

impl ShortfallRetry {
    /// Creates a new shortfall policy over the given generator.
    pub fn new(generator: BatchGenerator, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// Generates a batch for `domain`, topping up once if it falls short.
    ///
    /// Returns exactly `target_count` records when the attempts together
    /// produced enough, otherwise the partial sequence; a residual
    /// shortfall is reported, never an error.
    pub async fn ensure_full_batch(
        &self,
        domain: Domain,
        target_count: usize,
    ) -> Vec<ScenarioRecord> {
        let mut records = self.generator.generate(domain, target_count).await;
        if records.len() > target_count {
            // Ids are positional, so the kept prefix is already numbered
            // correctly.
            warn!(
                domain = domain.clean_label(),
                got = records.len(),
                expected = target_count,
                "Batch over-delivered, trimming to target"
            );
            records.truncate(target_count);
        }
        let mut attempt = 1u32;

        while records.len() < target_count && attempt < self.policy.max_attempts {
            warn!(
                domain = domain.clean_label(),
                got = records.len(),
                expected = target_count,
                attempt,
                "Batch shortfall, retrying after backoff"
            );
            tokio::time::sleep(self.policy.backoff).await;

            let needed = target_count - records.len();
            let retry_batch = self.generator.generate(domain, target_count).await;

            for mut record in retry_batch.into_iter().take(needed) {
                // Renumber by final position in the combined sequence
                let position = records.len();
                record.assign_identity(domain, self.generator.plan(), position);
                records.push(record);
            }

            attempt += 1;
        }

        if records.len() < target_count {
            warn!(
                domain = domain.clean_label(),
                got = records.len(),
                expected = target_count,
                "Batch still short after retry, proceeding with partial"
            );
        } else {
            info!(
                domain = domain.clean_label(),
                count = records.len(),
                "Batch complete"
            );
        }

        records
    }
}
