//! Model client adapters.
//!
//! - anthropic: Anthropic Messages API over HTTP
//! - scripted: deterministic stand-in for tests and dry runs
//! - retry / rate_limit: decorators composed by [`build_model_client`]

pub mod anthropic;
pub mod rate_limit;
pub mod retry;
pub mod scripted;

use std::sync::Arc;

use tracing::info;

pub use anthropic::AnthropicModelClient;
pub use rate_limit::RateLimitedModelClient;
pub use retry::RetryingModelClient;
pub use scripted::{ScriptedModelClient, ScriptedReply};

use crate::domain::models::Config;
use crate::domain::ports::{ModelClient, ModelError};

/// Build the configured provider wrapped in throttling and retries.
///
/// Retries sit outside the rate limiter so every attempt waits for a
/// token. The `mock` provider answers every prompt with `{}`.
pub fn build_model_client(config: &Config) -> Result<Arc<dyn ModelClient>, ModelError> {
    let provider: Arc<dyn ModelClient> = match config.model.provider.as_str() {
        "anthropic" => Arc::new(AnthropicModelClient::new(&config.model)?),
        "mock" => Arc::new(ScriptedModelClient::always("{}")),
        other => {
            return Err(ModelError::NotConfigured(format!(
                "unknown model provider '{other}' (expected anthropic or mock)"
            )))
        }
    };

    let limited = Arc::new(RateLimitedModelClient::new(provider, &config.rate_limit)?);
    let client = Arc::new(RetryingModelClient::new(limited, &config.retry));

    info!(
        provider = %config.model.provider,
        model = %config.model.name,
        max_retries = config.retry.max_retries,
        rps = config.rate_limit.requests_per_second,
        "model client ready"
    );

    Ok(client)
}
