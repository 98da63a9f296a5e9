//! Token-bucket throttling decorator.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

use crate::domain::models::RateLimitConfig;
use crate::domain::ports::{ModelClient, ModelError};

/// Wraps a client and waits for a token before every call.
pub struct RateLimitedModelClient {
    inner: Arc<dyn ModelClient>,
    limiter: DefaultDirectRateLimiter,
}

impl RateLimitedModelClient {
    /// Fails when either rate or burst is zero.
    pub fn new(inner: Arc<dyn ModelClient>, config: &RateLimitConfig) -> Result<Self, ModelError> {
        let rate = NonZeroU32::new(config.requests_per_second).ok_or_else(|| {
            ModelError::NotConfigured("rate_limit.requests_per_second must be > 0".to_string())
        })?;
        let burst = NonZeroU32::new(config.burst_size)
            .ok_or_else(|| ModelError::NotConfigured("rate_limit.burst_size must be > 0".to_string()))?;

        Ok(Self {
            inner,
            limiter: RateLimiter::direct(Quota::per_second(rate).allow_burst(burst)),
        })
    }
}

#[async_trait]
impl ModelClient for RateLimitedModelClient {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn ask(&self, prompt: &str) -> Result<String, ModelError> {
        self.limiter.until_ready().await;
        self.inner.ask(prompt).await
    }
}
