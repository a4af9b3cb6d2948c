//! Mock LLM Provider for testing
//!
//! Replies are served from a queue; once it drains, the fallback reply is
//! used. Every request is recorded so tests can assert on prompts.

use crate::completion::{CompletionRequest, CompletionResponse};
use crate::error::{Error, Result};
use crate::provider::LlmProvider;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text as the completion
    Text(String),
    /// Fail with `Error::Api(message)`
    Fail(String),
    /// Panic inside `complete`
    Panic(String),
}

impl MockReply {
    /// Shorthand for a text reply
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// A mock LLM provider that returns queued replies.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    fallback: MockReply,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a new mock provider answering "mock response".
    #[must_use]
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fallback: MockReply::text("mock response"),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Provider that always answers with `text`.
    #[must_use]
    pub fn with_reply(text: impl Into<String>) -> Self {
        Self {
            fallback: MockReply::Text(text.into()),
            ..Self::new()
        }
    }

    /// Provider whose every call fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fallback: MockReply::Fail(message.into()),
            ..Self::new()
        }
    }

    /// Queue a reply ahead of the fallback.
    pub fn push_reply(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    /// Number of completed or attempted calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Snapshot of every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Text(content) => Ok(CompletionResponse {
                content,
                usage: None,
                finish_reason: Some("stop".to_string()),
                model: "mock-model".to_string(),
            }),
            MockReply::Fail(message) => Err(Error::Api(message)),
            MockReply::Panic(message) => panic!("{message}"),
        }
    }
}
