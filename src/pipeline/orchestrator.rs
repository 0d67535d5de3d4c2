//! Run orchestration for a full generation pass.
//!
//! Iterates the configured domain list in order, drives the shortfall
//! policy for each domain, and appends every obtained batch to the
//! output store before moving to the next domain, so a later domain's
//! failure cannot lose an earlier domain's results. A fixed pacing delay
//! between domains keeps the run inside external rate limits.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::domains::Domain;
use crate::error::{ConfigError, StoreError};
use crate::store;

use super::retry::ShortfallRetry;

/// Errors that can occur during a generation run.
///
/// Only configuration and store-IO failures surface here; everything
/// the completion service does wrong is absorbed below this level.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Record store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Domains to generate, in order.
    pub domains: Vec<Domain>,
    /// Records to produce per domain.
    pub per_domain_target: usize,
    /// Output store path.
    pub output_path: PathBuf,
    /// Fixed delay between domains.
    pub pacing: Duration,
    /// Whether to truncate the output store at start-of-run.
    ///
    /// `true` is a destructive fresh run; `false` appends across
    /// repeated invocations. Both are valid and must be chosen
    /// explicitly by the caller.
    pub reset_output: bool,
}

impl RunConfig {
    /// Validates the configuration before any generation is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domains.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "domain list is empty".to_string(),
            ));
        }
        if self.per_domain_target == 0 {
            return Err(ConfigError::ValidationFailed(
                "per_domain_target must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Total records a complete run would produce.
    pub fn expected_total(&self) -> usize {
        self.domains.len() * self.per_domain_target
    }
}

/// Counters accumulated across one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Domains the run attempted.
    pub domains_processed: usize,
    /// Records appended to the output store.
    pub records_written: usize,
    /// Domains that stayed short of target after the retry.
    pub shortfalls: usize,
}

/// Drives a full sequential generation run.
pub struct RunOrchestrator {
    retry: ShortfallRetry,
    config: RunConfig,
}

impl RunOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(retry: ShortfallRetry, config: RunConfig) -> Self {
        Self { retry, config }
    }

    /// Runs generation for every configured domain.
    ///
    /// One domain is processed fully (generate, retry if needed, write)
    /// before the next begins. A domain that produced nothing is
    /// reported and skipped; the run always completes and leaves
    /// whatever was written on disk.
    pub async fn run(&self) -> Result<RunStats, PipelineError> {
        self.config.validate()?;

        if self.config.reset_output {
            info!(path = %self.config.output_path.display(), "Resetting output store");
            store::reset(&self.config.output_path)?;
        }

        let mut stats = RunStats::default();
        let domain_count = self.config.domains.len();

        for (index, domain) in self.config.domains.iter().enumerate() {
            info!(
                domain = domain.clean_label(),
                progress = format!("{}/{}", index + 1, domain_count),
                "Generating domain batch"
            );

            let records = self
                .retry
                .ensure_full_batch(*domain, self.config.per_domain_target)
                .await;

            if records.len() < self.config.per_domain_target {
                stats.shortfalls += 1;
            }

            if !records.is_empty() {
                let written = store::append(&self.config.output_path, &records)?;
                stats.records_written += written;
                info!(
                    domain = domain.clean_label(),
                    written,
                    total = stats.records_written,
                    "Appended domain batch to store"
                );
            } else {
                warn!(
                    domain = domain.clean_label(),
                    "Domain produced no records, moving on"
                );
            }

            stats.domains_processed += 1;

            // Pace between domains regardless of success or failure
            if index + 1 < domain_count {
                tokio::time::sleep(self.config.pacing).await;
            }
        }

        let expected = self.config.expected_total();
        if stats.records_written == expected {
            info!(
                total = stats.records_written,
                expected, "Run complete, full target reached"
            );
        } else {
            warn!(
                total = stats.records_written,
                expected,
                shortfalls = stats.shortfalls,
                "Run complete with shortfall"
            );
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LevelPlan;
    use crate::error::LlmError;
    use crate::llm::{Choice, GenerationRequest, GenerationResponse, LlmProvider, Message};
    use crate::pipeline::generator::BatchGenerator;
    use crate::pipeline::retry::RetryPolicy;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct ScriptedProvider {
        payloads: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            let mut payloads = self.payloads.lock().expect("lock");
            if payloads.is_empty() {
                return Err(LlmError::RequestFailed("script exhausted".to_string()));
            }
            let content = payloads.remove(0);
            Ok(GenerationResponse {
                id: "scripted".to_string(),
                model: "fake".to_string(),
                choices: vec![Choice {
                    index: 0,
                    message: Message {
                        role: "assistant".to_string(),
                        content,
                    },
                    finish_reason: "stop".to_string(),
                }],
                usage: None,
            })
        }
    }

    fn batch_payload(count: usize) -> String {
        let entries: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"scenario_context": "ctx {i}",
                        "user_prompt": "prompt {i}",
                        "rubric": {{"generic_failure": "g", "context_success": "c", "key_concept": "k"}}}}"#
                )
            })
            .collect();
        format!(r#"{{"scenarios": [{}]}}"#, entries.join(","))
    }

    fn orchestrator(payloads: Vec<String>, config: RunConfig) -> RunOrchestrator {
        let provider = Arc::new(ScriptedProvider {
            payloads: Mutex::new(payloads),
        });
        let generator = BatchGenerator::new(provider, "fake-model", LevelPlan::default());
        let retry = ShortfallRetry::new(
            generator,
            RetryPolicy {
                max_attempts: 2,
                backoff: Duration::ZERO,
            },
        );
        RunOrchestrator::new(retry, config)
    }

    fn run_config(output_path: PathBuf, domains: Vec<Domain>) -> RunConfig {
        RunConfig {
            domains,
            per_domain_target: 10,
            output_path,
            pacing: Duration::ZERO,
            reset_output: false,
        }
    }

    #[tokio::test]
    async fn test_run_writes_each_domain_before_the_next() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run.jsonl");

        // Second domain fails both attempts; first domain's records must survive
        let orchestrator = orchestrator(
            vec![batch_payload(10), "garbage".to_string(), "garbage".to_string()],
            run_config(path.clone(), vec![Domain::EconomicSystems, Domain::FoodDining]),
        );

        let stats = orchestrator.run().await.expect("run");
        assert_eq!(stats.domains_processed, 2);
        assert_eq!(stats.records_written, 10);
        assert_eq!(stats.shortfalls, 1);

        let scan = crate::store::read_records(&path).expect("read");
        assert_eq!(scan.records.len(), 10);
        assert!(scan.records.iter().all(|r| r.domain == "Economic Systems"));
    }

    #[tokio::test]
    async fn test_run_reports_full_total() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run.jsonl");

        let orchestrator = orchestrator(
            vec![batch_payload(10), batch_payload(10), batch_payload(10)],
            run_config(
                path,
                vec![
                    Domain::EconomicSystems,
                    Domain::FamilyKinship,
                    Domain::FoodDining,
                ],
            ),
        );

        let stats = orchestrator.run().await.expect("run");
        assert_eq!(stats.records_written, 30);
        assert_eq!(stats.shortfalls, 0);
    }

    #[tokio::test]
    async fn test_fresh_run_clears_prior_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run.jsonl");

        let first = orchestrator(
            vec![batch_payload(10)],
            run_config(path.clone(), vec![Domain::EconomicSystems]),
        );
        first.run().await.expect("first run");

        let mut config = run_config(path.clone(), vec![Domain::EconomicSystems]);
        config.reset_output = true;
        let second = orchestrator(vec![batch_payload(10)], config);
        second.run().await.expect("second run");

        let scan = crate::store::read_records(&path).expect("read");
        assert_eq!(scan.records.len(), 10);
    }

    #[tokio::test]
    async fn test_append_run_accumulates_across_invocations() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run.jsonl");

        for _ in 0..2 {
            let orchestrator = orchestrator(
                vec![batch_payload(10)],
                run_config(path.clone(), vec![Domain::EconomicSystems]),
            );
            orchestrator.run().await.expect("run");
        }

        let scan = crate::store::read_records(&path).expect("read");
        assert_eq!(scan.records.len(), 20);
    }

    #[tokio::test]
    async fn test_empty_domain_list_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let orchestrator = orchestrator(
            vec![],
            run_config(dir.path().join("run.jsonl"), vec![]),
        );

        let result = orchestrator.run().await;
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
