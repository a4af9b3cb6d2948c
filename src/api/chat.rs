//! Chat API endpoints
//!
//! POST   /api/v1/chat - Run one message through the workflow
//! GET    /api/v1/chat/history/:conversation_id - Stored turns
//! DELETE /api/v1/chat/history/:conversation_id - Drop stored turns
//! GET    /api/v1/chat/user/:user_id/conversations - Conversation index

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use switchyard_core::{
    ChatOrchestrator, ChatRequest, ChatResponse, ConversationHistory, UserConversations,
};
use tracing::info;

use super::error::ApiError;

/// Result of a history deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    pub conversation_id: String,
    pub cleared: bool,
}

async fn chat(
    Extension(orchestrator): Extension<Arc<ChatOrchestrator>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = body?;
    let response = orchestrator.chat(request).await?;
    Ok(Json(response))
}

async fn get_history(
    Extension(orchestrator): Extension<Arc<ChatOrchestrator>>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ConversationHistory>, ApiError> {
    Ok(Json(orchestrator.history(&conversation_id).await?))
}

async fn clear_history(
    Extension(orchestrator): Extension<Arc<ChatOrchestrator>>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ClearHistoryResponse>, ApiError> {
    let cleared = orchestrator.clear_history(&conversation_id).await?;
    info!(conversation_id = %conversation_id, cleared, "Conversation history cleared");
    Ok(Json(ClearHistoryResponse {
        conversation_id,
        cleared,
    }))
}

async fn user_conversations(
    Extension(orchestrator): Extension<Arc<ChatOrchestrator>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserConversations>, ApiError> {
    Ok(Json(orchestrator.user_conversations(&user_id).await?))
}

/// Chat routes
pub fn chat_routes() -> Router {
    Router::new()
        .route("/api/v1/chat", post(chat))
        .route(
            "/api/v1/chat/history/:conversation_id",
            get(get_history).delete(clear_history),
        )
        .route(
            "/api/v1/chat/user/:user_id/conversations",
            get(user_conversations),
        )
}
