//! Beliefscope - belief-state tracing for multi-agent workflows
//!
//! Captures each agent's belief state before every step, aligns the belief
//! trajectories of a successful and a failed run by `(step, agent_id)`,
//! scores the divergence of every aligned pair with a language model and
//! locates the Point of Causal Inevitability: the first step whose risk
//! divergence reaches a caller-chosen threshold.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): belief records, trajectories, scores and ports
//! - **Service Layer** (`services`): parsing, extraction, alignment, scoring, localization
//! - **Adapters** (`adapters`): model clients and JSON file storage
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use beliefscope::adapters::models::ScriptedModelClient;
//! use beliefscope::domain::models::RiskThreshold;
//! use beliefscope::services::ComparisonService;
//!
//! let service = ComparisonService::new(Arc::new(ScriptedModelClient::always("{}")), 4);
//! let report = service.compare(&reference, &failed, RiskThreshold::new(0.6)?).await;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AlignmentStats, BeliefKey, BeliefRecord, BeliefTrajectory, ComparisonReport, Config,
    DivergenceScore, RiskThreshold,
};
pub use domain::ports::{ModelClient, ModelError, StepContext, StepObserver, TrajectoryRepository};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{align, extract_json_object, locate, BeliefExtractor, ComparisonService, DivergenceScorer};
