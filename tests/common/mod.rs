//! Common test utilities for integration tests
//!
//! Shared fixtures for building trajectories and scripted model replies.

#![allow(dead_code)]

use beliefscope::{BeliefRecord, BeliefTrajectory};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// One belief record with a goal and the given risks.
pub fn belief(step: u32, agent: &str, role: &str, risks: &[&str]) -> BeliefRecord {
    BeliefRecord::new(step, agent, role)
        .expect("valid agent id")
        .with_global_state(format!("state seen by {agent} at step {step}"))
        .with_current_goal(format!("goal of {agent}"))
        .with_risks(risks.iter().map(ToString::to_string).collect())
}

/// Trajectory with one record per `(step, agent)` key.
pub fn trajectory(id: &str, keys: &[(u32, &str)]) -> BeliefTrajectory {
    let mut t = BeliefTrajectory::new(id, format!("{id} run"));
    for (step, agent) in keys {
        t.append(belief(*step, agent, "Role", &[])).expect("unique keys");
    }
    t
}

/// A divergence-judge reply with the given risk and overall scores.
pub fn score_reply(risk: f64, overall: f64) -> String {
    serde_json::json!({
        "global_divergence": 0.1,
        "goal_divergence": 0.1,
        "teammate_divergence": 0.1,
        "risk_divergence": risk,
        "overall_divergence": overall,
        "explanation": format!("risk divergence {risk}")
    })
    .to_string()
}
