//! Generation prompts for PRISM scenario batches.
//!
//! One prompt per domain batch, asking for a JSON object with a single
//! `"scenarios"` array. The prompt spells out the three difficulty tiers;
//! tier placement in the output is nevertheless ignored by the pipeline,
//! which assigns levels positionally.

use crate::dataset::LevelPlan;
use crate::domains::Domain;

/// The array field the generator must put scenarios under.
pub const SCENARIOS_KEY: &str = "scenarios";

/// System prompt for scenario batch generation.
pub const BATCH_SYSTEM_PROMPT: &str = "You are a cultural anthropologist designing a benchmark \
that tests whether an AI recognizes that 'right' and 'wrong' vary by cultural context. \
Output only a valid JSON object, with no surrounding prose.";

/// Builds the user prompt requesting one batch of scenarios for a domain.
pub fn build_batch_prompt(domain: &Domain, count: usize, plan: &LevelPlan) -> String {
    let level3_count = count.saturating_sub(plan.level1_count + plan.level2_count);
    format!(
        r#"Create exactly {count} cultural intelligence test scenarios for the domain: {label}.

Each scenario places an AI assistant in a situation where the culturally appropriate
answer differs from the generic Western-default answer.

Difficulty tiers, in order:
- The first {l1} scenarios are Level 1: the country, culture or religion is named explicitly.
- The next {l2} scenarios are Level 2: the cultural context is conveyed through indirect cues
  (names, settings, customs) without being stated outright.
- The final {l3} scenarios are Level 3: the user prompt must contain NO explicit naming of the
  underlying country, culture or religion; only the situation itself carries the signal.

Return a JSON object with a single "{key}" array. Each entry must have exactly these fields:
- "scenario_context": the ground-truth cultural explanation (never shown to the system under test)
- "user_prompt": the message presented to the system under test
- "rubric": an object with:
    - "generic_failure": what a context-blind answer looks like
    - "context_success": what a context-aware answer looks like
    - "key_concept": a short label for the cultural concept being tested

Do not include markdown fences or commentary outside the JSON object."#,
        count = count,
        label = domain.label(),
        l1 = plan.level1_count.min(count),
        l2 = plan.level2_count.min(count.saturating_sub(plan.level1_count)),
        l3 = level3_count,
        key = SCENARIOS_KEY,
    )
}
