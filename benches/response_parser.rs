use beliefscope::services::extract_json_object;
use beliefscope::DivergenceScore;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const BELIEF: &str = r#"{"global_state": "PRD drafted, schema pending", "current_goal": "Write the API design", "teammate_model": {"Alice": "Finished the PRD"}, "identified_risks": ["Rating range unspecified", "No auth story"]}"#;

fn bench_extract_json_object(c: &mut Criterion) {
    c.bench_function("extract_direct_object", |b| {
        b.iter(|| extract_json_object(black_box(BELIEF)))
    });

    let fenced = format!("Here is my belief state:\n```json\n{BELIEF}\n```\nLet me know.");
    c.bench_function("extract_fenced_object", |b| {
        b.iter(|| extract_json_object(black_box(&fenced)))
    });

    let inline = format!("Sure, my state is {BELIEF} and that is all.");
    c.bench_function("extract_inline_object", |b| {
        b.iter(|| extract_json_object(black_box(&inline)))
    });

    let prose = "I could not decide on a belief state this turn. ".repeat(200);
    c.bench_function("extract_no_object", |b| {
        b.iter(|| extract_json_object(black_box(&prose)))
    });
}

fn bench_score_validation(c: &mut Criterion) {
    let score: DivergenceScore = serde_json::from_value(serde_json::json!({
        "step": 3,
        "agent_id": "Carol",
        "global_divergence": 0.2,
        "goal_divergence": 0.4,
        "teammate_divergence": 0.1,
        "risk_divergence": 0.7,
        "overall_divergence": 0.5,
        "explanation": "missed the validation risk"
    }))
    .expect("valid score");

    c.bench_function("divergence_score_validate", |b| {
        b.iter(|| black_box(&score).validate())
    });
}

criterion_group!(benches, bench_extract_json_object, bench_score_validation);
criterion_main!(benches);
