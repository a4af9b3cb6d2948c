//! Web API module for Switchyard
//!
//! Provides REST API endpoints for:
//! - Chat (route, process, convert)
//! - Conversation history
//! - Health

pub mod chat;
pub mod error;
pub mod health;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{Extension, Router};
use switchyard_core::ChatOrchestrator;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use chat::chat_routes;
pub use error::{ApiError, ErrorBody};
pub use health::health_routes;

/// Create the application router with all endpoints and layers
pub fn api_router(orchestrator: Arc<ChatOrchestrator>, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(chat_routes())
        .merge(health_routes())
        .layer(Extension(orchestrator))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

/// CORS from configured origins; `"*"` allows any, invalid entries are skipped
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}
