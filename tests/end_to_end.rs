mod common;

use std::sync::Arc;

use beliefscope::adapters::models::{ScriptedModelClient, ScriptedReply};
use beliefscope::adapters::storage::{read_report, read_trajectory, write_report, write_trajectory, JsonFileStore};
use beliefscope::services::{record_team_step, relocate, ObservedAgent};
use beliefscope::{
    align, locate, BeliefExtractor, BeliefKey, BeliefTrajectory, ComparisonService, RiskThreshold,
    StepContext, StepObserver, TrajectoryRepository,
};

use common::{belief, score_reply, setup_test_logging, temp_dir, trajectory};

#[test]
fn test_alignment_scenario_with_one_gap_per_side() {
    let a = trajectory("A", &[(1, "Alice"), (2, "Bob")]);
    let b = trajectory("B", &[(1, "Alice"), (3, "Carol")]);

    let alignment = align(&a, &b);
    assert_eq!(alignment.keys(), vec![BeliefKey::new(1, "Alice")]);
    assert_eq!(alignment.stats.gap_count(), 2);
}

#[tokio::test]
async fn test_trajectory_file_round_trip() {
    let dir = temp_dir();
    let path = dir.path().join("run.json");

    let mut t = BeliefTrajectory::new("run", "three records");
    t.append(belief(0, "Alice", "ProductManager", &["Rating range unspecified"])
        .with_teammate("Bob", "Waiting on the PRD"))
        .unwrap();
    t.append(belief(1, "Bob", "Architect", &[])).unwrap();
    t.append(belief(2, "Carol", "Engineer", &["No input validation", "No tests"]))
        .unwrap();

    write_trajectory(&path, &t).await.unwrap();
    let loaded = read_trajectory(&path).await.unwrap();

    assert_eq!(loaded, t);
    assert!(loaded.records()[1].identified_risks.is_empty());
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["records"][1]["identified_risks"], serde_json::json!([]));
}

#[tokio::test]
async fn test_identical_runs_have_no_pci_with_zero_scoring_stub() {
    let run = trajectory("run", &[(0, "Alice"), (1, "Bob"), (2, "Carol")]);
    let stub = ScriptedModelClient::always(score_reply(0.0, 0.0));
    let service = ComparisonService::new(Arc::new(stub), 2);

    let report = service.compare(&run, &run, RiskThreshold::new(0.5).unwrap()).await;
    assert_eq!(report.divergence_scores.len(), 3);
    assert!(report.divergence_scores.iter().all(|s| s.overall_divergence.abs() < 0.05));
    assert!(report.pci.is_none());
}

/// Record two runs through the step observer, persist them, compare them
/// and move the threshold on the saved report.
#[tokio::test]
async fn test_full_pipeline_from_extraction_to_relocation() {
    setup_test_logging();

    let extraction = ScriptedModelClient::new();
    extraction
        .add_rule("named Alice", ScriptedReply::text(r#"{"current_goal": "PRD", "identified_risks": ["rating range"]}"#))
        .await;
    extraction
        .add_rule("named Bob", ScriptedReply::text("```json\n{\"current_goal\": \"schema\"}\n```"))
        .await;
    extraction
        .add_rule("named Carol", ScriptedReply::text("Sure: {\"current_goal\": \"code\"}"))
        .await;
    let observer = BeliefExtractor::new(Arc::new(extraction));

    let mut reference = BeliefTrajectory::new("reference", "run that shipped");
    let mut failed = BeliefTrajectory::new("failed", "run that broke");
    for step in 0..2 {
        let contexts: Vec<StepContext> = [("Alice", "ProductManager"), ("Bob", "Architect"), ("Carol", "Engineer")]
            .iter()
            .map(|(agent, role)| StepContext::new(step, *agent, *role).with_context_summary("Environment: ratings"))
            .collect();
        assert_eq!(record_team_step(&observer, &contexts, &mut reference).await.unwrap(), 3);
        assert_eq!(record_team_step(&observer, &contexts, &mut failed).await.unwrap(), 3);
    }

    let observer: Arc<dyn StepObserver> = Arc::new(observer);
    let mut dave = ObservedAgent::new("Dave", "QaEngineer", observer).unwrap();
    dave.after_step();
    dave.after_step();
    assert_eq!(dave.current_step(), 2);
    let key = dave.before_step("ctx", "RunTests: run the suite", "No recent memories", &mut reference).await;
    assert!(key.unwrap().is_none(), "no scripted reply for Dave is a miss");
    assert_eq!(reference.len(), 6);

    let dir = temp_dir();
    let store = JsonFileStore::new(dir.path());
    store.save_trajectory(&reference).await.unwrap();
    store.save_trajectory(&failed).await.unwrap();

    let judge = ScriptedModelClient::new();
    judge.add_rule("\"step\": 0", ScriptedReply::text(score_reply(0.3, 0.2))).await;
    judge.add_rule("\"step\": 1,\n  \"agent_id\": \"Alice\"", ScriptedReply::text(score_reply(0.7, 0.5))).await;
    judge.add_rule("\"step\": 1,\n  \"agent_id\": \"Bob\"", ScriptedReply::text("not a score")).await;
    judge.add_rule("\"step\": 1,\n  \"agent_id\": \"Carol\"", ScriptedReply::text(score_reply(0.9, 0.8))).await;
    let service = ComparisonService::new(Arc::new(judge), 3);

    let report = service
        .compare_stored(&store, "reference", "failed", "run", RiskThreshold::new(0.6).unwrap())
        .await
        .unwrap();

    assert_eq!(report.alignment.aligned_pairs, 6);
    assert_eq!(report.alignment.gap_count(), 0);
    assert_eq!(report.scoring_misses, 1);
    assert_eq!(report.divergence_scores.len(), 5);
    assert_eq!(report.pci.as_ref().map(|s| s.key()), Some(BeliefKey::new(1, "Alice")));
    assert_eq!(
        locate(&report.divergence_scores, RiskThreshold::new(0.85).unwrap()).map(|s| s.key()),
        Some(BeliefKey::new(1, "Carol"))
    );

    let report_path = dir.path().join("run.report.json");
    let mut saved = read_report(&report_path).await.unwrap();
    assert_eq!(saved, report);

    relocate(&mut saved, RiskThreshold::new(0.25).unwrap());
    assert_eq!(saved.pci.as_ref().map(|s| s.key()), Some(BeliefKey::new(0, "Alice")));
    write_report(&report_path, &saved).await.unwrap();
    assert_eq!(store.load_report("run").await.unwrap(), Some(saved));
}
