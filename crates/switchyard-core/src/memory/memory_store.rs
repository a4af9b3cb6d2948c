use super::{ConversationStore, StoreResult, DEFAULT_CONVERSATION_TTL_SECS};
use crate::types::ConversationRecord;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
struct Expiring<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Expiring<T> {
    fn live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Default)]
struct Inner {
    conversations: HashMap<String, Expiring<Vec<ConversationRecord>>>,
    users: HashMap<String, Expiring<BTreeSet<String>>>,
}

impl Inner {
    fn purge_expired(&mut self, now: Instant) {
        self.conversations.retain(|_, e| e.live(now));
        self.users.retain(|_, e| e.live(now));
    }
}

/// In-memory conversation store (development and tests)
///
/// Data is lost on restart. Expiry mirrors the Redis store: both entries
/// are refreshed on append and ignored once expired. Expired entries are
/// dropped on every append.
#[derive(Debug, Clone)]
pub struct MemoryConversationStore {
    inner: Arc<RwLock<Inner>>,
    ttl: Duration,
}

impl Default for MemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConversationStore {
    /// Store with the default 30 day retention
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_CONVERSATION_TTL_SECS))
    }

    /// Store with a custom retention
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            ttl,
        }
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, conversation_id: &str, record: ConversationRecord) -> StoreResult<bool> {
        let now = Instant::now();
        let expires_at = now + self.ttl;
        let mut inner = self.inner.write().await;
        inner.purge_expired(now);

        let user_id = record.user_id.clone();

        let turns = inner
            .conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| Expiring {
                value: Vec::new(),
                expires_at,
            });
        turns.value.push(record);
        turns.expires_at = expires_at;

        let index = inner.users.entry(user_id).or_insert_with(|| Expiring {
            value: BTreeSet::new(),
            expires_at,
        });
        index.value.insert(conversation_id.to_string());
        index.expires_at = expires_at;

        debug!(conversation_id, "Conversation turn stored in memory");
        Ok(true)
    }

    async fn history(&self, conversation_id: &str) -> StoreResult<Vec<ConversationRecord>> {
        let now = Instant::now();
        let inner = self.inner.read().await;
        Ok(inner
            .conversations
            .get(conversation_id)
            .filter(|e| e.live(now))
            .map(|e| e.value.clone())
            .unwrap_or_default())
    }

    async fn conversations_for_user(&self, user_id: &str) -> StoreResult<Vec<String>> {
        let now = Instant::now();
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .get(user_id)
            .filter(|e| e.live(now))
            .map(|e| e.value.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn clear(&self, conversation_id: &str) -> StoreResult<bool> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        Ok(inner
            .conversations
            .remove(conversation_id)
            .is_some_and(|e| e.live(now)))
    }

    async fn message_count(&self, conversation_id: &str) -> StoreResult<usize> {
        Ok(self.history(conversation_id).await?.len())
    }
}
