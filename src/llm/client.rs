//! Core LLM client trait, error type and a scripted mock

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{CompletionRequest, CompletionResponse};

/// Stateless LLM client - each call carries the full transcript
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model id this client talks to
    fn model(&self) -> &str;
}

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Rate limited (429), retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scripted client for tests: replays replies in order and records requests
#[derive(Debug, Default)]
pub struct MockLlmClient {
    script: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that answers with each text in turn
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        for reply in replies {
            mock.push_reply(reply);
        }
        mock
    }

    pub fn push_reply(&self, content: impl Into<String>) {
        self.push(Ok(CompletionResponse::text(content)));
    }

    pub fn push_error(&self, error: LlmError) {
        self.push(Err(error));
    }

    fn push(&self, item: Result<CompletionResponse, LlmError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(item);
        }
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("mock script exhausted".to_string())))
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
