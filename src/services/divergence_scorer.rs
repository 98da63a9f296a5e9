//! Divergence scoring.
//!
//! Asks the model to judge one aligned pair at a time and maps its answer
//! onto a validated [`DivergenceScore`]. Pairs are independent, so
//! [`DivergenceScorer::score_all`] fans them out while keeping the output
//! in input order.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::{BeliefRecord, DivergenceDimensions, DivergenceScore};
use crate::domain::ports::ModelClient;
use crate::services::prompts::render_divergence_prompt;
use crate::services::response_parser::extract_json_object;

/// Score fields as the model reports them. Missing numbers mean "no
/// evidence of divergence" and default to 0.0.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScorePayload {
    global_divergence: f64,
    goal_divergence: f64,
    teammate_divergence: f64,
    risk_divergence: f64,
    overall_divergence: f64,
    explanation: String,
}

/// Scores of a batch, plus how many pairs produced none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringOutcome {
    /// Successful scores, in input pair order.
    pub scores: Vec<DivergenceScore>,
    /// Pairs skipped after a model failure or an unusable answer.
    pub misses: usize,
}

/// Model-backed judge of belief divergence.
pub struct DivergenceScorer {
    client: Arc<dyn ModelClient>,
    max_concurrent: usize,
}

impl DivergenceScorer {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            max_concurrent: 1,
        }
    }

    /// Allow up to `max_concurrent` scoring calls in flight (minimum 1).
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Score one pair. `None` on model failure, parse miss or an
    /// out-of-range value.
    #[instrument(skip_all, fields(step = reference.step, agent = %reference.agent_id))]
    pub async fn score(&self, reference: &BeliefRecord, failed: &BeliefRecord) -> Option<DivergenceScore> {
        let (reference_json, failed_json) = match (reference.to_pretty_json(), failed.to_pretty_json()) {
            (Ok(r), Ok(f)) => (r, f),
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "scoring skipped: could not render belief records");
                return None;
            }
        };

        let prompt = render_divergence_prompt(&reference_json, &failed_json);
        let response = match self.client.ask(&prompt).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "scoring skipped: model call failed");
                return None;
            }
        };

        let Some(object) = extract_json_object(&response) else {
            warn!("scoring skipped: no JSON object in response");
            return None;
        };

        let payload: ScorePayload = match serde_json::from_value(Value::Object(object)) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "scoring skipped: malformed score fields");
                return None;
            }
        };

        let dims = DivergenceDimensions {
            global: payload.global_divergence,
            goal: payload.goal_divergence,
            teammate: payload.teammate_divergence,
            risk: payload.risk_divergence,
            overall: payload.overall_divergence,
        };

        match DivergenceScore::new(reference.key(), dims, payload.explanation) {
            Ok(score) => {
                debug!(
                    overall = score.overall_divergence,
                    risk = score.risk_divergence,
                    "pair scored"
                );
                Some(score)
            }
            Err(err) => {
                warn!(error = %err, "scoring skipped: score rejected");
                None
            }
        }
    }

    /// Score every pair, at most `max_concurrent` at a time.
    ///
    /// Output order follows `pairs`, not call completion. Failed pairs are
    /// skipped and counted.
    pub async fn score_all(&self, pairs: &[(&BeliefRecord, &BeliefRecord)]) -> ScoringOutcome {
        let results: Vec<Option<DivergenceScore>> = stream::iter(pairs.iter())
            .map(|(reference, failed)| self.score(reference, failed))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let scores: Vec<DivergenceScore> = results.into_iter().flatten().collect();
        let misses = pairs.len() - scores.len();

        if misses > 0 {
            warn!(scored = scores.len(), misses, "some pairs could not be scored");
        } else {
            info!(scored = scores.len(), "all pairs scored");
        }

        ScoringOutcome { scores, misses }
    }
}
