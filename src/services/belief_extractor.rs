//! Belief extraction.
//!
//! One model call per snapshot: render the belief template, ask the model,
//! recover the JSON object and map it onto a [`BeliefRecord`]. Misses and
//! model failures yield `Ok(None)` and never abort the host run.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{BeliefKey, BeliefRecord, BeliefTrajectory};
use crate::domain::ports::{ModelClient, StepContext, StepObserver};
use crate::services::prompts::{render_belief_prompt, BeliefPromptInput};
use crate::services::response_parser::extract_json_object;

/// Belief fields as the model reports them. Missing fields default to
/// empty; fields of the wrong type make the whole answer a miss.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BeliefPayload {
    global_state: String,
    current_goal: String,
    teammate_model: BTreeMap<String, String>,
    identified_risks: Vec<String>,
}

/// Turns free model text into belief records.
pub struct BeliefExtractor {
    client: Arc<dyn ModelClient>,
}

impl BeliefExtractor {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Extract the belief of `role_name` at `step`.
    ///
    /// `Err` only for a blank `role_name`. A model failure or an answer
    /// without a usable JSON object is logged and returned as `Ok(None)`.
    /// No retries happen here; wrap the client for that.
    #[instrument(skip(self, role_profile, context_summary, action_description, recent_memory_summary), fields(model = self.client.name()))]
    pub async fn extract(
        &self,
        role_profile: &str,
        role_name: &str,
        context_summary: &str,
        action_description: &str,
        recent_memory_summary: &str,
        step: u32,
    ) -> DomainResult<Option<BeliefRecord>> {
        if role_name.trim().is_empty() {
            return Err(DomainError::InvalidAgentId);
        }

        let prompt = render_belief_prompt(&BeliefPromptInput {
            role_profile,
            role_name,
            context_summary,
            action_description,
            recent_memory_summary,
        });

        let response = match self.client.ask(&prompt).await {
            Ok(response) => response,
            Err(err) => {
                warn!(agent = role_name, step, error = %err, "belief extraction skipped: model call failed");
                return Ok(None);
            }
        };

        let Some(object) = extract_json_object(&response) else {
            warn!(agent = role_name, step, "belief extraction skipped: no JSON object in response");
            return Ok(None);
        };

        let payload: BeliefPayload = match serde_json::from_value(Value::Object(object)) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(agent = role_name, step, error = %err, "belief extraction skipped: malformed belief fields");
                return Ok(None);
            }
        };

        let record = BeliefRecord::new(step, role_name, role_profile)?
            .with_global_state(payload.global_state)
            .with_current_goal(payload.current_goal)
            .with_teammate_model(payload.teammate_model)
            .with_risks(payload.identified_risks)
            .with_timestamp(Utc::now().to_rfc3339())
            .with_raw_text(response);

        info!(
            agent = role_name,
            step,
            risks = record.risk_count(),
            goal = %preview(&record.current_goal, 50),
            "belief extracted"
        );

        Ok(Some(record))
    }

    /// [`extract`](Self::extract) driven by a host-supplied context.
    pub async fn extract_from(&self, context: &StepContext) -> DomainResult<Option<BeliefRecord>> {
        self.extract(
            &context.agent_role,
            &context.agent_id,
            &context.context_summary,
            &context.action_description,
            &context.recent_memory_summary,
            context.step,
        )
        .await
    }
}

#[async_trait]
impl StepObserver for BeliefExtractor {
    async fn on_before_step(&self, context: &StepContext) -> Option<BeliefRecord> {
        match self.extract_from(context).await {
            Ok(record) => record,
            Err(err) => {
                warn!(agent = %context.agent_id, step = context.step, error = %err, "step observer rejected context");
                None
            }
        }
    }
}

/// Per-agent driver for a host that runs one agent at a time.
///
/// Holds the agent's identity and step counter. The trajectory is owned
/// by the caller and passed into every call.
pub struct ObservedAgent {
    agent_id: String,
    agent_role: String,
    step: u32,
    observer: Arc<dyn StepObserver>,
}

impl ObservedAgent {
    pub fn new(
        agent_id: impl Into<String>,
        agent_role: impl Into<String>,
        observer: Arc<dyn StepObserver>,
    ) -> DomainResult<Self> {
        let agent_id = agent_id.into();
        if agent_id.trim().is_empty() {
            return Err(DomainError::InvalidAgentId);
        }
        Ok(Self {
            agent_id,
            agent_role: agent_role.into(),
            step: 0,
            observer,
        })
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn current_step(&self) -> u32 {
        self.step
    }

    /// Capture the agent's belief at the current step.
    ///
    /// On success the record is appended to `trajectory` and its key is
    /// returned. A miss returns `Ok(None)` and leaves `trajectory` as is;
    /// a duplicate key is an error.
    pub async fn before_step(
        &self,
        context_summary: &str,
        action_description: &str,
        recent_memory_summary: &str,
        trajectory: &mut BeliefTrajectory,
    ) -> DomainResult<Option<BeliefKey>> {
        let context = StepContext::new(self.step, self.agent_id.clone(), self.agent_role.clone())
            .with_context_summary(context_summary)
            .with_action_description(action_description)
            .with_recent_memory_summary(recent_memory_summary);

        let Some(record) = self.observer.on_before_step(&context).await else {
            return Ok(None);
        };

        let key = record.key();
        trajectory.append(record)?;
        Ok(Some(key))
    }

    /// Advance the step counter once the host has run the agent's action.
    pub fn after_step(&mut self) {
        self.step += 1;
    }
}

/// Capture beliefs for several agents acting at the same step.
///
/// Extractions run concurrently; successes are appended in input order
/// once all have finished, so `trajectory` is never partially updated.
/// Returns the number of records appended.
pub async fn record_team_step(
    observer: &dyn StepObserver,
    contexts: &[StepContext],
    trajectory: &mut BeliefTrajectory,
) -> DomainResult<usize> {
    let results = join_all(contexts.iter().map(|ctx| observer.on_before_step(ctx))).await;

    let records: Vec<BeliefRecord> = results.into_iter().flatten().collect();
    let captured = records.len();
    let missed = contexts.len() - captured;
    if missed > 0 {
        warn!(captured, missed, "team step recorded with extraction misses");
    } else {
        debug!(captured, "team step recorded");
    }

    trajectory.extend(records)?;
    Ok(captured)
}

/// One message of an agent's memory, as the host exposes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMessage {
    pub role: String,
    pub content: String,
}

impl MemoryMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Describe the shared environment and who is on the team.
pub fn summarize_environment<S: AsRef<str>>(description: Option<&str>, team_members: &[S]) -> String {
    if description.is_none() && team_members.is_empty() {
        return "No environment context available".to_string();
    }

    let description = description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No environment description");
    let members = team_members
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Environment: {description}. Team members: {members}")
}

/// Describe the action an agent is about to run.
pub fn describe_action(name: Option<&str>, doc: Option<&str>) -> String {
    match name {
        Some(name) => {
            let doc = doc
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or("No description");
            format!("{name}: {doc}")
        }
        None => "No current action".to_string(),
    }
}

/// Render the last `window` messages, one line each, content cut to
/// `preview_chars` characters. A `window` of 0 takes every message.
///
/// `None` means the agent has no memory at all, which is reported
/// differently from a memory that holds no messages yet.
pub fn summarize_recent_memory(
    memory: Option<&[MemoryMessage]>,
    window: usize,
    preview_chars: usize,
) -> String {
    let Some(messages) = memory else {
        return "No memory available".to_string();
    };

    let start = match window {
        0 => 0,
        n => messages.len().saturating_sub(n),
    };
    let recent = &messages[start..];
    if recent.is_empty() {
        return "No recent memories".to_string();
    }

    recent
        .iter()
        .map(|m| format!("- [{}] {}...", m.role, preview(&m.content, preview_chars)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
