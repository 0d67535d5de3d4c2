//! Scenario record model and identifier derivation.
//!
//! A [`ScenarioRecord`] is one benchmark item. Identifiers are always
//! assigned by the pipeline from (domain code, level code, batch position);
//! whatever the generator puts in its own `id`, `domain` or `level` fields
//! is overwritten during normalization.

use serde::{Deserialize, Serialize};

use crate::domains::Domain;

/// Difficulty tiers of a scenario.
///
/// Level 1 scenarios name the culture explicitly, Level 2 give indirect
/// cues, Level 3 give none at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    One,
    Two,
    Three,
}

impl Level {
    /// Returns the canonical tier label written into records.
    pub fn label(&self) -> &'static str {
        match self {
            Level::One => "Level 1",
            Level::Two => "Level 2",
            Level::Three => "Level 3",
        }
    }

    /// Returns the short code used in scenario identifiers.
    pub fn code(&self) -> &'static str {
        match self {
            Level::One => "L1",
            Level::Two => "L2",
            Level::Three => "L3",
        }
    }
}

/// Positional level thresholds for one generation batch.
///
/// The first `level1_count` records of a batch are tier 1, the next
/// `level2_count` are tier 2, and the remainder are tier 3. Level
/// assignment is purely positional; the generator's own `level` field is
/// never trusted.
#[derive(Debug, Clone, Copy)]
pub struct LevelPlan {
    pub level1_count: usize,
    pub level2_count: usize,
}

impl Default for LevelPlan {
    fn default() -> Self {
        // Default split for a batch of 10: 4 / 3 / 3
        Self {
            level1_count: 4,
            level2_count: 3,
        }
    }
}

impl LevelPlan {
    /// Returns the level for a zero-based batch position.
    pub fn level_for(&self, position: usize) -> Level {
        if position < self.level1_count {
            Level::One
        } else if position < self.level1_count + self.level2_count {
            Level::Two
        } else {
            Level::Three
        }
    }
}

/// Derives the identifier for a scenario at a zero-based batch position.
///
/// Pure function of its inputs: generating twice with identical inputs
/// yields identical ids.
pub fn scenario_id(domain: Domain, level: Level, position: usize) -> String {
    format!("{}_{}_{:03}", domain.code(), level.code(), position + 1)
}

/// The rubric for judging a response to one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    /// What a generic, context-blind answer looks like.
    pub generic_failure: String,
    /// What a context-aware answer looks like.
    pub context_success: String,
    /// Short label for the cultural concept being tested.
    pub key_concept: String,
}

/// One benchmark item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Globally unique identifier, assigned by the pipeline.
    pub id: String,
    /// Human-readable domain label, without parenthetical qualifiers.
    pub domain: String,
    /// Canonical tier label ("Level 1".."Level 3").
    pub level: String,
    /// Ground-truth cultural explanation, not shown to the system under test.
    pub scenario_context: String,
    /// The stimulus presented to the system under test.
    pub user_prompt: String,
    /// Pass/fail rubric.
    pub rubric: Rubric,
}

impl ScenarioRecord {
    /// Rewrites `id`, `domain` and `level` from the record's final batch
    /// position.
    ///
    /// Called once after parsing a batch, and again for retry top-up
    /// records, which are renumbered by their position in the combined
    /// sequence rather than their position in the retry batch.
    pub fn assign_identity(&mut self, domain: Domain, plan: &LevelPlan, position: usize) {
        let level = plan.level_for(position);
        self.id = scenario_id(domain, level, position);
        self.domain = domain.clean_label().to_string();
        self.level = level.label().to_string();
    }
}
