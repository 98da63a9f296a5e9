//! Domain errors for the beliefscope diagnostic core.

use thiserror::Error;

/// Domain-level errors that can occur while building trajectories and
/// comparing them.
///
/// Recoverable misses (an unparseable model reply, a failed model call, a
/// key present on only one side of an alignment, no PCI found) are *not*
/// represented here: they surface as `None` or as counters on the
/// comparison report. Only conditions that must halt the current operation
/// are errors.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(
        "Duplicate belief key (step {step}, agent '{agent_id}') in trajectory '{trajectory_id}'"
    )]
    DuplicateBeliefKey {
        trajectory_id: String,
        step: u32,
        agent_id: String,
    },

    #[error("Agent id must not be empty")]
    InvalidAgentId,

    #[error("Score field '{field}' out of range [0, 1]: {value}")]
    ScoreOutOfRange { field: &'static str, value: f64 },

    #[error("Invalid risk threshold: {0}. Must be within [0, 1]")]
    InvalidThreshold(f64),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            DomainError::NotFound(err.to_string())
        } else {
            DomainError::StorageError(err.to_string())
        }
    }
}
