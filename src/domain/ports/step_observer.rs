//! Step observer port - the host-runtime lifecycle hook.
//!
//! A host driver calls [`StepObserver::on_before_step`] exactly once right
//! before it runs an agent's per-step decision logic. The observer reads
//! the three text inputs carried by [`StepContext`] and never calls back
//! into the host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::models::BeliefRecord;

/// Everything the host hands over before an agent acts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepContext {
    /// Step number of the agent that is about to act.
    pub step: u32,
    /// Agent identifier (name).
    pub agent_id: String,
    /// Role archetype of the agent.
    pub agent_role: String,
    /// Summary of the environment and team.
    pub context_summary: String,
    /// Description of the action the agent is about to take.
    pub action_description: String,
    /// Bounded window of recent memory, as plain text.
    pub recent_memory_summary: String,
}

impl StepContext {
    pub fn new(step: u32, agent_id: impl Into<String>, agent_role: impl Into<String>) -> Self {
        Self {
            step,
            agent_id: agent_id.into(),
            agent_role: agent_role.into(),
            context_summary: String::new(),
            action_description: String::new(),
            recent_memory_summary: String::new(),
        }
    }

    pub fn with_context_summary(mut self, summary: impl Into<String>) -> Self {
        self.context_summary = summary.into();
        self
    }

    pub fn with_action_description(mut self, action: impl Into<String>) -> Self {
        self.action_description = action.into();
        self
    }

    pub fn with_recent_memory_summary(mut self, memory: impl Into<String>) -> Self {
        self.recent_memory_summary = memory.into();
        self
    }
}

/// Callback interface invoked by a host driver before each agent step.
///
/// Returns the belief captured at this step, or `None` when nothing could
/// be captured. Implementations must never fail the host run.
#[async_trait]
pub trait StepObserver: Send + Sync {
    async fn on_before_step(&self, context: &StepContext) -> Option<BeliefRecord>;
}
