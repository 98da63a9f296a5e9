//! Scripted model client for tests and dry runs.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{ModelClient, ModelError};

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this text.
    Text(String),
    /// Fail the call with this error.
    Fail(ModelError),
}

impl ScriptedReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Fail(ModelError::Unavailable(message.into()))
    }

    fn into_result(self) -> Result<String, ModelError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Fail(err) => Err(err),
        }
    }
}

/// Deterministic model stand-in.
///
/// Lookup order per call: the first rule whose needle occurs in the
/// prompt, then the next queued reply, then the default reply. With none
/// of those configured the call fails with [`ModelError::Unavailable`].
#[derive(Clone, Default)]
pub struct ScriptedModelClient {
    rules: Arc<RwLock<Vec<(String, ScriptedReply)>>>,
    queue: Arc<RwLock<VecDeque<ScriptedReply>>>,
    default_reply: Option<ScriptedReply>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl ScriptedModelClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client that answers every prompt with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            default_reply: Some(ScriptedReply::text(text)),
            ..Self::default()
        }
    }

    /// Client whose every call fails as unavailable.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            default_reply: Some(ScriptedReply::unavailable(message)),
            ..Self::default()
        }
    }

    /// Answer prompts containing `needle` with `reply`.
    pub async fn add_rule(&self, needle: impl Into<String>, reply: ScriptedReply) {
        self.rules.write().await.push((needle.into(), reply));
    }

    /// Queue a reply for the next unmatched call.
    pub async fn push_reply(&self, reply: ScriptedReply) {
        self.queue.write().await.push_back(reply);
    }

    /// Every prompt received so far, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.prompts.read().await.len()
    }

    async fn next_reply(&self, prompt: &str) -> Option<ScriptedReply> {
        {
            let rules = self.rules.read().await;
            if let Some((_, reply)) = rules.iter().find(|(needle, _)| prompt.contains(needle.as_str())) {
                return Some(reply.clone());
            }
        }

        if let Some(reply) = self.queue.write().await.pop_front() {
            return Some(reply);
        }

        self.default_reply.clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn ask(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.write().await.push(prompt.to_string());

        match self.next_reply(prompt).await {
            Some(reply) => reply.into_result(),
            None => Err(ModelError::Unavailable("script exhausted".to_string())),
        }
    }
}
