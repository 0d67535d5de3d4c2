//! Batch generation for one domain.
//!
//! Issues one generation request, parses the result into scenario
//! records, and normalizes identifiers and level tags. Every failure
//! mode of the completion service (transport error, non-JSON payload,
//! missing array) is recovered locally by returning an empty batch;
//! nothing here ever raises to the caller.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::dataset::{LevelPlan, Rubric, ScenarioRecord};
use crate::domains::Domain;
use crate::llm::{GenerationRequest, LlmProvider, Message, ResponseFormat};
use crate::prompts::{build_batch_prompt, BATCH_SYSTEM_PROMPT, SCENARIOS_KEY};
use crate::utils::json_extraction::extract_json_object;

/// One scenario entry as the generator returns it.
///
/// The generator may also emit `id`, `domain` and `level` fields; they
/// are ignored here and re-derived during normalization.
#[derive(Debug, Deserialize)]
struct RawScenario {
    scenario_context: String,
    user_prompt: String,
    rubric: Rubric,
}

/// Generates one validated batch of scenario records per domain.
pub struct BatchGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f64,
    max_tokens: Option<u32>,
    plan: LevelPlan,
}

impl BatchGenerator {
    /// Creates a new batch generator over the given completion provider.
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, plan: LevelPlan) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.8,
            max_tokens: None,
            plan,
        }
    }

    /// Set the sampling temperature for generation requests.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output-size cap for generation requests.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The positional level plan used for normalization.
    pub fn plan(&self) -> &LevelPlan {
        &self.plan
    }

    /// Generates one batch of scenario records for `domain`.
    ///
    /// Returns an empty vec on any service or decode failure; a batch
    /// smaller than `expected_count` is the shortfall condition handled
    /// one layer up.
    pub async fn generate(&self, domain: Domain, expected_count: usize) -> Vec<ScenarioRecord> {
        let prompt = build_batch_prompt(&domain, expected_count, &self.plan);

        let mut request = GenerationRequest::new(
            self.model.clone(),
            vec![Message::system(BATCH_SYSTEM_PROMPT), Message::user(prompt)],
        )
        .with_temperature(self.temperature)
        .with_response_format(ResponseFormat::json_object());
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = match self.provider.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(domain = domain.clean_label(), error = %e, "Generation request failed");
                return Vec::new();
            }
        };

        let Some(content) = response.first_content() else {
            warn!(domain = domain.clean_label(), "Response contained no content");
            return Vec::new();
        };

        let raw = self.parse_batch(domain, content);

        let mut records = Vec::with_capacity(raw.len());
        for (position, scenario) in raw.into_iter().enumerate() {
            let mut record = ScenarioRecord {
                id: String::new(),
                domain: String::new(),
                level: String::new(),
                scenario_context: scenario.scenario_context,
                user_prompt: scenario.user_prompt,
                rubric: scenario.rubric,
            };
            record.assign_identity(domain, &self.plan, position);
            records.push(record);
        }

        debug!(
            domain = domain.clean_label(),
            got = records.len(),
            expected = expected_count,
            "Parsed generation batch"
        );

        records
    }

    /// Extracts the scenarios array from the response text.
    ///
    /// A payload that is not a JSON object, or that lacks the array
    /// field, yields an empty batch. Individual entries that fail to
    /// decode are skipped so one malformed entry does not discard its
    /// siblings.
    fn parse_batch(&self, domain: Domain, content: &str) -> Vec<RawScenario> {
        let Some(json) = extract_json_object(content) else {
            warn!(domain = domain.clean_label(), "No JSON object in response");
            return Vec::new();
        };

        let value: serde_json::Value = match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                warn!(domain = domain.clean_label(), error = %e, "Response is not valid JSON");
                return Vec::new();
            }
        };

        let Some(entries) = value.get(SCENARIOS_KEY).and_then(|v| v.as_array()) else {
            warn!(
                domain = domain.clean_label(),
                key = SCENARIOS_KEY,
                "Response object has no scenarios array"
            );
            return Vec::new();
        };

        let mut scenarios = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match serde_json::from_value::<RawScenario>(entry.clone()) {
                Ok(scenario) => scenarios.push(scenario),
                Err(e) => {
                    warn!(
                        domain = domain.clean_label(),
                        index,
                        error = %e,
                        "Skipping malformed scenario entry"
                    );
                }
            }
        }

        scenarios
    }
}
