//! Model client port - interface for the language-model collaborator.
//!
//! The core only ever asks a model one question and reads one answer back.
//! Everything else (transport, authentication, retries, throttling) lives
//! behind this trait.

use async_trait::async_trait;

/// Error types for model calls.
///
/// The diagnostic core never distinguishes between these: any failure is
/// "no response" for the belief or score being produced. The variants
/// exist so that decorators such as the retrying client can tell transient
/// failures from permanent ones.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("Model client not configured: {0}")]
    NotConfigured(String),

    #[error("Model unavailable: {0}")]
    Unavailable(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Model call timed out after {0}s")]
    Timeout(u64),

    #[error("Model request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

impl ModelError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::RateLimited(_) | Self::Timeout(_)
        )
    }
}

/// Port trait for language-model backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single client is shared by
/// concurrent extractions and by the scoring fan-out.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Short identifier of the backend, e.g. "anthropic" or "scripted".
    fn name(&self) -> &str;

    /// Send one prompt and return the model's raw text reply.
    ///
    /// May suspend for an unspecified time. Timeouts are a property of the
    /// implementation and surface as [`ModelError::Timeout`].
    async fn ask(&self, prompt: &str) -> Result<String, ModelError>;
}
