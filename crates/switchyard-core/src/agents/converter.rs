//! Conversational rewrite of raw agent answers.
//!
//! Best effort: any failure returns the original answer.

use crate::error::ConversionError;
use crate::logging::preview;
use crate::prompts::{conversion_message, CONVERSION_SYSTEM_PROMPT};
use switchyard_llm::LlmClient;
use tracing::{info, warn};

/// Rewrites agent output with the router's LLM
#[derive(Debug, Clone)]
pub struct ResponseConverter {
    llm: LlmClient,
}

impl ResponseConverter {
    /// Create a converter
    #[must_use]
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Single conversion attempt.
    ///
    /// # Errors
    ///
    /// `EmptyResponse` when the model answers with nothing, `Llm` when the
    /// call fails.
    pub async fn try_convert(
        &self,
        original_query: &str,
        agent_response: &str,
        agent_type: &str,
    ) -> Result<String, ConversionError> {
        let message = conversion_message(original_query, agent_type, agent_response);
        let content = self.llm.ask(&message, CONVERSION_SYSTEM_PROMPT).await?;
        if content.trim().is_empty() {
            return Err(ConversionError::EmptyResponse);
        }
        Ok(content)
    }

    /// Rewrite `agent_response`, falling back to it unchanged on failure.
    pub async fn convert(
        &self,
        original_query: &str,
        agent_response: &str,
        agent_type: &str,
    ) -> String {
        info!(
            agent_type,
            response_preview = preview(agent_response),
            query_preview = preview(original_query),
            "Starting response conversion"
        );

        match self
            .try_convert(original_query, agent_response, agent_type)
            .await
        {
            Ok(converted) => {
                info!(
                    agent_type,
                    converted_response_preview = preview(&converted),
                    "Response conversion completed"
                );
                converted
            }
            Err(e) => {
                warn!(agent_type, error = %e, "Response conversion failed, using original");
                agent_response.to_string()
            }
        }
    }
}
