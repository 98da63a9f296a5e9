//! Belief record domain model.
//!
//! A [`BeliefRecord`] is one agent's self-reported mental state at one
//! decision point: how it reads the overall task, what it is trying to do
//! next, what it thinks of its teammates, and which risks it has noticed.
//! Records are created once per extraction and never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Logical alignment key of a belief record.
///
/// Orders by step first and agent id second, which is the chronological
/// order used by alignment and PCI localization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeliefKey {
    pub step: u32,
    pub agent_id: String,
}

impl BeliefKey {
    pub fn new(step: u32, agent_id: impl Into<String>) -> Self {
        Self {
            step,
            agent_id: agent_id.into(),
        }
    }
}

impl fmt::Display for BeliefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.step, self.agent_id)
    }
}

/// One agent's cognitive snapshot at one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeliefRecord {
    /// Step number, monotonic per agent.
    pub step: u32,

    /// Agent identifier (the agent's name within the team).
    #[serde(alias = "role_name")]
    pub agent_id: String,

    /// Role archetype, e.g. "ProductManager".
    #[serde(alias = "role_profile")]
    pub agent_role: String,

    /// The agent's understanding of overall task state.
    #[serde(default)]
    pub global_state: String,

    /// What the agent is trying to achieve right now.
    #[serde(default)]
    pub current_goal: String,

    /// Teammate id -> belief about that teammate.
    #[serde(default)]
    pub teammate_model: BTreeMap<String, String>,

    /// Risks the agent has identified, in the order it reported them.
    #[serde(default)]
    pub identified_risks: Vec<String>,

    /// ISO-8601 time of extraction.
    #[serde(default)]
    pub timestamp: Option<String>,

    /// Untouched model output, kept for audit.
    #[serde(default, alias = "raw_response")]
    pub raw_text: Option<String>,
}

impl BeliefRecord {
    /// Create a record with empty belief content.
    ///
    /// Fails with [`DomainError::InvalidAgentId`] when `agent_id` is blank.
    pub fn new(
        step: u32,
        agent_id: impl Into<String>,
        agent_role: impl Into<String>,
    ) -> DomainResult<Self> {
        let agent_id = agent_id.into();
        if agent_id.trim().is_empty() {
            return Err(DomainError::InvalidAgentId);
        }

        Ok(Self {
            step,
            agent_id,
            agent_role: agent_role.into(),
            global_state: String::new(),
            current_goal: String::new(),
            teammate_model: BTreeMap::new(),
            identified_risks: Vec::new(),
            timestamp: None,
            raw_text: None,
        })
    }

    pub fn with_global_state(mut self, state: impl Into<String>) -> Self {
        self.global_state = state.into();
        self
    }

    pub fn with_current_goal(mut self, goal: impl Into<String>) -> Self {
        self.current_goal = goal.into();
        self
    }

    pub fn with_teammate(mut self, teammate: impl Into<String>, belief: impl Into<String>) -> Self {
        self.teammate_model.insert(teammate.into(), belief.into());
        self
    }

    pub fn with_teammate_model(mut self, model: BTreeMap<String, String>) -> Self {
        self.teammate_model = model;
        self
    }

    pub fn with_risk(mut self, risk: impl Into<String>) -> Self {
        self.identified_risks.push(risk.into());
        self
    }

    pub fn with_risks(mut self, risks: Vec<String>) -> Self {
        self.identified_risks = risks;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_raw_text(mut self, raw: impl Into<String>) -> Self {
        self.raw_text = Some(raw.into());
        self
    }

    /// The `(step, agent_id)` alignment key.
    pub fn key(&self) -> BeliefKey {
        BeliefKey::new(self.step, self.agent_id.clone())
    }

    /// Number of risks the agent reported.
    pub fn risk_count(&self) -> usize {
        self.identified_risks.len()
    }

    /// Case-insensitive substring search over the identified risks.
    ///
    /// Risk equality is exact by default; this is the explicit
    /// normalization path for callers that want fuzzy matching.
    pub fn has_risk(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.identified_risks
            .iter()
            .any(|risk| risk.to_lowercase().contains(&needle))
    }

    /// Risks lowercased, trimmed, deduplicated and sorted.
    pub fn risks_normalized(&self) -> Vec<String> {
        let mut risks: Vec<String> = self
            .identified_risks
            .iter()
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty())
            .collect();
        risks.sort();
        risks.dedup();
        risks
    }

    /// Pretty JSON rendering, used when embedding the record in prompts.
    pub fn to_pretty_json(&self) -> DomainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Risks compare as a multiset: same statements, any order.
fn same_risks(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&String> = a.iter().collect();
    let mut b: Vec<&String> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}

impl PartialEq for BeliefRecord {
    fn eq(&self, other: &Self) -> bool {
        self.step == other.step
            && self.agent_id == other.agent_id
            && self.agent_role == other.agent_role
            && self.global_state == other.global_state
            && self.current_goal == other.current_goal
            && self.teammate_model == other.teammate_model
            && same_risks(&self.identified_risks, &other.identified_risks)
            && self.timestamp == other.timestamp
            && self.raw_text == other.raw_text
    }
}

impl Eq for BeliefRecord {}
