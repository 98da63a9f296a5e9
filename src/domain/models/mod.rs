//! Domain models.

pub mod belief;
pub mod config;
pub mod divergence;
pub mod trajectory;

pub use belief::{BeliefKey, BeliefRecord};
pub use config::{
    ComparisonConfig, Config, LoggingConfig, ModelConfig, RateLimitConfig, RetryConfig,
};
pub use divergence::{
    AlignmentStats, ComparisonReport, DivergenceDimensions, DivergenceScore, RiskThreshold,
};
pub use trajectory::BeliefTrajectory;
