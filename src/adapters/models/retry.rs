//! Retry decorator with exponential backoff.
//!
//! Retries only transient [`ModelError`]s (unavailable, rate limited,
//! timeout). Permanent errors are returned on the first attempt.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use tracing::warn;

use crate::domain::models::RetryConfig;
use crate::domain::ports::{ModelClient, ModelError};

/// Wraps a client and retries transient failures.
pub struct RetryingModelClient {
    inner: Arc<dyn ModelClient>,
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryingModelClient {
    pub fn new(inner: Arc<dyn ModelClient>, config: &RetryConfig) -> Self {
        Self {
            inner,
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms.max(config.initial_backoff_ms)),
        }
    }
}

#[async_trait]
impl ModelClient for RetryingModelClient {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn ask(&self, prompt: &str) -> Result<String, ModelError> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_backoff)
            .with_max_interval(self.max_backoff)
            .with_max_elapsed_time(None)
            .build();

        let inner = &self.inner;
        let max_retries = self.max_retries;
        let mut attempt: u32 = 0;

        let operation = || {
            attempt += 1;
            let this_attempt = attempt;
            async move {
                inner.ask(prompt).await.map_err(|err| {
                    if err.is_transient() && this_attempt <= max_retries {
                        backoff::Error::transient(err)
                    } else {
                        backoff::Error::permanent(err)
                    }
                })
            }
        };

        backoff::future::retry_notify(policy, operation, |err: ModelError, wait: Duration| {
            warn!(
                client = self.inner.name(),
                error = %err,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "transient model error, retrying"
            );
        })
        .await
    }
}
