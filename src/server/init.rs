//! Service construction and HTTP server startup
//!
//! The LLM clients, knowledge engine provider and conversation store are
//! built once here and shared by every request through the orchestrator.

use super::config::{AppConfig, KnowledgeConfig, LlmConfig, RedisConfig};
use super::validation::validate_production_config;
use crate::api::api_router;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use switchyard_core::memory::ConversationStore;
use switchyard_core::{
    ChatOrchestrator, Dispatcher, Error as CoreError, KnowledgeEngineProvider, MathSolver,
    MemoryConversationStore, RedisConversationStore, RemoteEngineLoader, ResponseConverter, Router,
    SuspiciousFilter,
};
use switchyard_llm::{LlmClient, LlmProvider, OpenAiConfig, OpenAiProvider};
use tracing::{info, warn};

/// Run the server
pub async fn run(config: AppConfig) -> Result<()> {
    validate_production_config(&config);
    let orchestrator = Arc::new(build_orchestrator(&config).await?);

    let app = api_router(orchestrator, &config.server.cors_origins);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Switchyard shutdown complete");
    Ok(())
}

/// Build the orchestrator and its services from configuration
pub async fn build_orchestrator(config: &AppConfig) -> Result<ChatOrchestrator> {
    let provider = build_llm_provider(&config.llm)?;

    let router_llm = LlmClient::new(provider.clone())
        .with_model(&config.llm.router_model)
        .with_temperature(config.llm.temperature);
    let math_llm = LlmClient::new(provider)
        .with_model(&config.llm.math_model)
        .with_temperature(config.llm.temperature);

    let knowledge = Arc::new(build_knowledge_provider(&config.knowledge));
    warm_up_knowledge(&knowledge).await;

    let dispatcher = Dispatcher::new(
        Router::new(
            router_llm.clone(),
            SuspiciousFilter::new((&config.security).into()),
        ),
        MathSolver::new(math_llm),
        ResponseConverter::new(router_llm),
        knowledge,
    );

    let store = build_store(&config.redis).await?;
    Ok(ChatOrchestrator::new(dispatcher).with_store(store))
}

fn build_llm_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let openai = openai_config(config)?;

    info!(
        router_model = %config.router_model,
        math_model = %config.math_model,
        base_url = ?config.base_url,
        "LLM provider configured"
    );
    Ok(Arc::new(OpenAiProvider::new(openai)))
}

/// Provider settings from `[llm]` plus `OPENAI_API_KEY`
fn openai_config(config: &LlmConfig) -> std::result::Result<OpenAiConfig, CoreError> {
    if !config.provider.eq_ignore_ascii_case("openai") {
        return Err(CoreError::Configuration(format!(
            "unsupported LLM provider '{}' (only 'openai' is available)",
            config.provider
        )));
    }

    let mut openai = OpenAiConfig::from_env()
        .map_err(|e| CoreError::Configuration(e.to_string()))?
        .with_timeout(Duration::from_secs(config.timeout_secs));
    if let Some(base_url) = &config.base_url {
        openai = openai.with_base_url(base_url);
    }
    Ok(openai)
}

fn build_knowledge_provider(config: &KnowledgeConfig) -> KnowledgeEngineProvider {
    if !config.enabled {
        info!("Knowledge engine disabled");
        return KnowledgeEngineProvider::disabled();
    }
    KnowledgeEngineProvider::new(Arc::new(RemoteEngineLoader::new(
        &config.base_url,
        Duration::from_secs(config.timeout_secs),
    )))
}

/// One initialisation attempt; failure leaves the provider retrying lazily
async fn warm_up_knowledge(provider: &KnowledgeEngineProvider) {
    if provider.get().await.is_some() {
        info!("Knowledge engine ready");
    } else {
        warn!("Knowledge engine not ready yet, will retry on first knowledge query");
    }
}

/// Conversation store selected by `[redis] enabled`
pub async fn build_store(config: &RedisConfig) -> Result<Arc<dyn ConversationStore>> {
    if !config.enabled {
        info!(
            ttl_secs = config.conversation_ttl_secs,
            "Using in-memory conversation store"
        );
        return Ok(Arc::new(MemoryConversationStore::with_ttl(
            Duration::from_secs(config.conversation_ttl_secs),
        )));
    }

    let store = RedisConversationStore::new(
        &config.url,
        &config.key_prefix,
        config.conversation_ttl_secs,
    )
    .context("Failed to create Redis conversation store")?;

    match store.ping().await {
        Ok(()) => info!(prefix = %config.key_prefix, "Connected to Redis conversation store"),
        Err(e) => warn!(
            error = %e,
            "Redis not reachable at startup; conversation history will fail until it is"
        ),
    }

    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
