//! Chat orchestrator
//!
//! One linear workflow per message: validate, route, process, convert,
//! persist, respond. Only validation escapes as an error; everything after
//! it is contained by the dispatcher or swallowed here.

use crate::dispatcher::{DispatchContext, Dispatcher};
use crate::error::{Error, Result};
use crate::logging::preview;
use crate::memory::ConversationStore;
use crate::messages::MESSAGE_CANNOT_BE_EMPTY;
use crate::security::sanitize_user_input;
use crate::types::{
    ChatRequest, ChatResponse, ConversationHistory, ConversationRecord, Decision,
    UserConversations,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Top-level chat workflow
pub struct ChatOrchestrator {
    dispatcher: Dispatcher,
    store: Option<Arc<dyn ConversationStore>>,
}

impl std::fmt::Debug for ChatOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatOrchestrator")
            .field("dispatcher", &self.dispatcher)
            .field("store", &self.store.as_ref().map(|s| s.backend()))
            .finish()
    }
}

impl ChatOrchestrator {
    /// Orchestrator without persistence
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            store: None,
        }
    }

    /// Attach a conversation store
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The dispatcher (for warm-up and health checks)
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Whether a conversation store is attached
    #[must_use]
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Run one message through the workflow.
    ///
    /// # Errors
    ///
    /// `Error::Validation` if the sanitised message is empty. No other
    /// error is returned.
    #[instrument(skip(self, request), fields(conversation_id = %request.conversation_id, user_id = %request.user_id))]
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let started = Instant::now();

        let sanitized = sanitize_user_input(&request.message);
        let message = sanitized.trim();
        if message.is_empty() {
            return Err(Error::Validation(MESSAGE_CANNOT_BE_EMPTY.to_string()));
        }

        let ctx = DispatchContext::new(&request, message);
        let mut workflow_history = Vec::with_capacity(3);

        let (decision, route_step) = self.dispatcher.route(&ctx).await;
        workflow_history.push(route_step);

        let (source_agent_response, process_step) = self.dispatcher.dispatch(decision, &ctx).await;
        workflow_history.push(process_step);

        let conversion_ctx = ctx.for_conversion(&source_agent_response, decision);
        let (response, convert_step) = self
            .dispatcher
            .dispatch(Decision::ResponseConversion, &conversion_ctx)
            .await;
        workflow_history.push(convert_step);

        self.persist(&request, message, &source_agent_response, decision)
            .await;

        info!(
            decision = %decision,
            query_preview = preview(message),
            execution_time_ms = started.elapsed().as_millis() as u64,
            "Chat request completed"
        );

        Ok(ChatResponse {
            user_id: request.user_id.clone(),
            conversation_id: request.conversation_id.clone(),
            router_decision: decision.as_str().to_string(),
            response,
            source_agent_response,
            workflow_history,
        })
    }

    async fn persist(
        &self,
        request: &ChatRequest,
        message: &str,
        agent_response: &str,
        decision: Decision,
    ) {
        let Some(store) = &self.store else {
            debug!("No conversation store configured, skipping persistence");
            return;
        };

        let record = ConversationRecord {
            timestamp: Utc::now(),
            user_id: request.user_id.clone(),
            user_message: message.to_string(),
            agent_response: agent_response.to_string(),
            agent: decision.as_str().to_string(),
        };

        if let Err(e) = store.append(&request.conversation_id, record).await {
            warn!(
                backend = store.backend(),
                conversation_id = %request.conversation_id,
                error = %e,
                "Failed to persist conversation turn"
            );
        }
    }

    /// Stored turns of a conversation; empty without a store.
    ///
    /// # Errors
    ///
    /// `Error::Store` when the configured store fails.
    pub async fn history(&self, conversation_id: &str) -> Result<ConversationHistory> {
        let Some(store) = &self.store else {
            return Ok(ConversationHistory::empty(conversation_id));
        };
        let history = store.history(conversation_id).await?;
        Ok(ConversationHistory {
            conversation_id: conversation_id.to_string(),
            message_count: history.len(),
            history,
        })
    }

    /// Conversation ids of a user; empty without a store.
    ///
    /// # Errors
    ///
    /// `Error::Store` when the configured store fails.
    pub async fn user_conversations(&self, user_id: &str) -> Result<UserConversations> {
        let ids = match &self.store {
            Some(store) => store.conversations_for_user(user_id).await?,
            None => Vec::new(),
        };
        Ok(UserConversations::new(user_id, ids))
    }

    /// Delete a conversation's turns; false without a store.
    ///
    /// # Errors
    ///
    /// `Error::Store` when the configured store fails.
    pub async fn clear_history(&self, conversation_id: &str) -> Result<bool> {
        match &self.store {
            Some(store) => Ok(store.clear(conversation_id).await?),
            None => Ok(false),
        }
    }
}
