use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion service not configured: {0}")]
    NotConfigured(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Content filtered")]
    ContentFiltered,
    #[error("Empty response")]
    EmptyResponse,
}

/// Abstraction over a hosted text-completion model.
/// Implementations take a prompt and return the model's free-text answer.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Same as [`complete`](Self::complete) but asks the backend for a bare
    /// JSON document. Backends without a JSON mode fall back to plain text.
    async fn complete_json(&self, prompt: &str) -> Result<String, CompletionError> {
        self.complete(prompt).await
    }
}

#[async_trait]
impl<T: TextCompletion + ?Sized> TextCompletion for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        (**self).complete(prompt).await
    }

    async fn complete_json(&self, prompt: &str) -> Result<String, CompletionError> {
        (**self).complete_json(prompt).await
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

enum MockReply {
    Text(String),
    Fail(String),
}

/// Returns a pre-set reply (or a pre-set failure) and records every prompt
/// it receives.
pub struct MockCompletion {
    reply: MockReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    pub fn reply(text: impl Into<String>) -> Self {
        Self::with(MockReply::Text(text.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with(MockReply::Fail(message.into()))
    }

    fn with(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextCompletion for MockCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(message) => Err(CompletionError::Network(message.clone())),
        }
    }
}
