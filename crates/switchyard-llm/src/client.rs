//! The `ask` capability agents depend on.
//!
//! An [`LlmClient`] pairs a provider with the model settings for one role
//! (routing or math). Each role gets its own client so models can differ.

use crate::completion::CompletionRequest;
use crate::error::Result;
use crate::message::Message;
use crate::provider::LlmProvider;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Provider plus per-role model settings
#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LlmClient {
    /// Wrap a provider; the provider's default model is used until overridden.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider,
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Override the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap generated tokens
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Model in use
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `message` under `system_prompt` and return the trimmed reply.
    ///
    /// # Errors
    ///
    /// Propagates provider failures unchanged.
    pub async fn ask(&self, message: &str, system_prompt: &str) -> Result<String> {
        let mut request = CompletionRequest::new(self.model.clone())
            .with_message(Message::system(system_prompt))
            .with_message(Message::user(message));
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        let response = self.provider.complete(request).await?;
        debug!(
            provider = self.provider.name(),
            model = %response.model,
            chars = response.content.len(),
            "LLM reply received"
        );
        Ok(response.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageRole;
    use crate::mock::MockProvider;

    #[tokio::test]
    async fn test_ask_trims_and_sends_both_messages() {
        let mock = Arc::new(MockProvider::with_reply("  MathAgent \n"));
        let client = LlmClient::new(mock.clone())
            .with_model("router-model")
            .with_temperature(0.0);

        let reply = client.ask("2 + 2", "classify this").await.unwrap();
        assert_eq!(reply, "MathAgent");

        let sent = &mock.requests()[0];
        assert_eq!(sent.model, "router-model");
        assert_eq!(sent.temperature, Some(0.0));
        assert_eq!(sent.messages[0].role, MessageRole::System);
        assert_eq!(sent.messages[0].content, "classify this");
        assert_eq!(sent.user_message(), Some("2 + 2"));
    }

    #[tokio::test]
    async fn test_ask_propagates_errors() {
        let client = LlmClient::new(Arc::new(MockProvider::failing("down")));
        assert!(client.ask("q", "s").await.is_err());
    }

    #[test]
    fn test_default_model_from_provider() {
        let client = LlmClient::new(Arc::new(MockProvider::new()));
        assert_eq!(client.model(), "mock-model");
    }
}
