//! Health check endpoint
//!
//! `/health` answers "healthy" + version for load balancers and also reports
//! whether the knowledge engine and conversation store are wired up.

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use switchyard_core::ChatOrchestrator;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub knowledge_ready: bool,
    pub history_enabled: bool,
}

async fn health_check(
    Extension(orchestrator): Extension<Arc<ChatOrchestrator>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        knowledge_ready: orchestrator.dispatcher().knowledge().is_ready(),
        history_enabled: orchestrator.has_store(),
    })
}

/// Health routes
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}
