//! Knowledge agent
//!
//! The retrieval engine itself lives out of process. This module holds the
//! [`KnowledgeEngine`] capability, an HTTP implementation of it, the lazy
//! [`KnowledgeEngineProvider`], and `query_knowledge`, which applies the
//! answer policy on top of any engine.

use crate::error::KnowledgeError;
use crate::logging::preview;
use crate::messages::KNOWLEDGE_NO_INFORMATION;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

/// Answer plus the documents it was drawn from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeAnswer {
    /// Answer text
    pub answer: String,
    /// Source URLs or document ids
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Retrieval capability
#[async_trait::async_trait]
pub trait KnowledgeEngine: Send + Sync {
    /// Answer `text` from the index
    async fn query(&self, text: &str) -> Result<KnowledgeAnswer, KnowledgeError>;
}

/// Query an engine and apply the no-information substitution.
///
/// # Errors
///
/// `EmptyQuery` for blank input; engine failures become `Query`.
pub async fn query_knowledge(
    query: &str,
    engine: &dyn KnowledgeEngine,
) -> Result<String, KnowledgeError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(KnowledgeError::EmptyQuery);
    }

    info!(query_preview = preview(query), "Starting knowledge base query");

    let result = engine.query(query).await.map_err(|e| {
        error!(query_preview = preview(query), error = %e, "Error querying the knowledge base");
        match e {
            KnowledgeError::Query(_) => e,
            other => KnowledgeError::Query(other.to_string()),
        }
    })?;

    let answer = result.answer.trim();
    let answer = if answer.is_empty()
        || answer.eq_ignore_ascii_case("none")
        || answer.eq_ignore_ascii_case("null")
    {
        KNOWLEDGE_NO_INFORMATION.to_string()
    } else {
        answer.to_string()
    };

    info!(
        query_preview = preview(query),
        sources = ?result.sources,
        "Knowledge base query completed"
    );
    Ok(answer)
}

// ============================================================================
// Remote engine
// ============================================================================

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    #[serde(default)]
    index_ready: bool,
}

/// HTTP client for the out-of-process retrieval service
#[derive(Debug, Clone)]
pub struct RemoteKnowledgeEngine {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteKnowledgeEngine {
    /// Create a client for `base_url`.
    ///
    /// # Errors
    ///
    /// `KnowledgeError::Query` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, KnowledgeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KnowledgeError::Query(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Whether the service reports its index as built.
    ///
    /// # Errors
    ///
    /// Transport or decoding failures.
    pub async fn index_ready(&self) -> Result<bool, KnowledgeError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| KnowledgeError::Query(e.to_string()))?;

        if !response.status().is_success() {
            return Ok(false);
        }
        let body: HealthBody = response
            .json()
            .await
            .map_err(|e| KnowledgeError::Query(e.to_string()))?;
        Ok(body.index_ready)
    }
}

#[async_trait::async_trait]
impl KnowledgeEngine for RemoteKnowledgeEngine {
    async fn query(&self, text: &str) -> Result<KnowledgeAnswer, KnowledgeError> {
        let response = self
            .client
            .post(format!("{}/query", self.base_url))
            .json(&QueryBody { query: text })
            .send()
            .await
            .map_err(|e| KnowledgeError::Query(e.to_string()))?
            .error_for_status()
            .map_err(|e| KnowledgeError::Query(e.to_string()))?;

        response
            .json::<KnowledgeAnswer>()
            .await
            .map_err(|e| KnowledgeError::Query(format!("invalid response: {e}")))
    }
}

// ============================================================================
// Lazy provider
// ============================================================================

/// Builds an engine once its index exists
#[async_trait::async_trait]
pub trait EngineLoader: Send + Sync {
    /// `None` while the index is not built or the service is unreachable
    async fn load(&self) -> Option<Arc<dyn KnowledgeEngine>>;
}

/// Loads a [`RemoteKnowledgeEngine`] after its health check passes
#[derive(Debug, Clone)]
pub struct RemoteEngineLoader {
    base_url: String,
    timeout: Duration,
}

impl RemoteEngineLoader {
    /// Create a loader
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl EngineLoader for RemoteEngineLoader {
    async fn load(&self) -> Option<Arc<dyn KnowledgeEngine>> {
        info!(base_url = %self.base_url, "Initializing knowledge engine");
        let engine = match RemoteKnowledgeEngine::new(self.base_url.clone(), self.timeout) {
            Ok(engine) => engine,
            Err(e) => {
                error!(error = %e, "Could not build knowledge engine client");
                return None;
            }
        };

        match engine.index_ready().await {
            Ok(true) => {
                info!("Knowledge engine initialized");
                Some(Arc::new(engine))
            }
            Ok(false) => {
                warn!("Index not built yet; knowledge agent disabled until it is");
                None
            }
            Err(e) => {
                warn!(error = %e, "Knowledge service unreachable");
                None
            }
        }
    }
}

/// Process-wide, lazily initialised knowledge engine.
///
/// A failed load is not cached, so a later call retries. The first
/// successful load is kept for the life of the process. Only one load runs
/// at a time; callers arriving while it is in flight get `None` at once.
pub struct KnowledgeEngineProvider {
    loader: Option<Arc<dyn EngineLoader>>,
    engine: RwLock<Option<Arc<dyn KnowledgeEngine>>>,
    loading: Mutex<()>,
}

impl std::fmt::Debug for KnowledgeEngineProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeEngineProvider")
            .field("has_loader", &self.loader.is_some())
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl KnowledgeEngineProvider {
    fn with_parts(
        loader: Option<Arc<dyn EngineLoader>>,
        engine: Option<Arc<dyn KnowledgeEngine>>,
    ) -> Self {
        Self {
            loader,
            engine: RwLock::new(engine),
            loading: Mutex::new(()),
        }
    }

    /// Provider that loads on first use
    #[must_use]
    pub fn new(loader: Arc<dyn EngineLoader>) -> Self {
        Self::with_parts(Some(loader), None)
    }

    /// Provider with an engine already available
    #[must_use]
    pub fn ready(engine: Arc<dyn KnowledgeEngine>) -> Self {
        Self::with_parts(None, Some(engine))
    }

    /// Provider that never yields an engine (knowledge disabled)
    #[must_use]
    pub fn disabled() -> Self {
        Self::with_parts(None, None)
    }

    /// Whether an engine has been loaded
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.engine
            .try_read()
            .map(|engine| engine.is_some())
            .unwrap_or(false)
    }

    /// Current engine, loading it if needed; `None` while unavailable.
    pub async fn get(&self) -> Option<Arc<dyn KnowledgeEngine>> {
        if let Some(engine) = self.engine.read().await.as_ref() {
            return Some(engine.clone());
        }
        let loader = self.loader.as_ref()?;

        let Ok(_guard) = self.loading.try_lock() else {
            debug!("Knowledge engine load already in progress");
            return None;
        };

        // A load may have finished between the read and taking the lock
        if let Some(engine) = self.engine.read().await.as_ref() {
            return Some(engine.clone());
        }

        match loader.load().await {
            Some(engine) => {
                *self.engine.write().await = Some(engine.clone());
                Some(engine)
            }
            None => {
                debug!("Knowledge engine still unavailable");
                None
            }
        }
    }
}
