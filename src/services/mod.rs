//! Service layer: the diagnostic core.
//!
//! - response_parser: JSON object recovery from model text
//! - belief_extractor: one model call per belief snapshot
//! - trajectory_aligner: key-based pairing of two runs
//! - divergence_scorer: model-judged divergence per pair
//! - pci_locator: first risk-divergence crossing
//! - comparison: the full reference-vs-failed run

pub mod belief_extractor;
pub mod comparison;
pub mod divergence_scorer;
pub mod pci_locator;
pub mod prompts;
pub mod response_parser;
pub mod trajectory_aligner;

pub use belief_extractor::{
    describe_action, record_team_step, summarize_environment, summarize_recent_memory,
    BeliefExtractor, MemoryMessage, ObservedAgent,
};
pub use comparison::ComparisonService;
pub use divergence_scorer::{DivergenceScorer, ScoringOutcome};
pub use pci_locator::{locate, relocate};
pub use response_parser::{extract_json_object, JsonObject};
pub use trajectory_aligner::{align, Alignment};
