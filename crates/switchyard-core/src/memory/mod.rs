//! Conversation history storage
//!
//! Each turn is appended to a per-conversation list, and the conversation
//! id is added to a per-user index. Both expire after the retention window
//! and are refreshed on every append.
//!
//! - `RedisConversationStore` for deployments
//! - `MemoryConversationStore` for development and tests

mod memory_store;
mod redis_store;

pub use memory_store::MemoryConversationStore;
pub use redis_store::RedisConversationStore;

use crate::error::StoreError;
use crate::types::ConversationRecord;
use async_trait::async_trait;

/// Default retention: 30 days
pub const DEFAULT_CONVERSATION_TTL_SECS: u64 = 30 * 24 * 3600;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Key of the list holding a conversation's turns
#[must_use]
pub fn conversation_key(prefix: &str, conversation_id: &str) -> String {
    format!("{prefix}conversation:{conversation_id}")
}

/// Key of the set holding a user's conversation ids
#[must_use]
pub fn user_conversations_key(prefix: &str, user_id: &str) -> String {
    format!("{prefix}user_conversations:{user_id}")
}

/// Conversation store capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Backend name for logs
    fn backend(&self) -> &'static str;

    /// Append a turn and index the conversation under `record.user_id`
    async fn append(&self, conversation_id: &str, record: ConversationRecord)
        -> StoreResult<bool>;

    /// Turns of a conversation, oldest first
    async fn history(&self, conversation_id: &str) -> StoreResult<Vec<ConversationRecord>>;

    /// Conversation ids for a user, ascending
    async fn conversations_for_user(&self, user_id: &str) -> StoreResult<Vec<String>>;

    /// Drop a conversation's turns; true if anything was removed
    async fn clear(&self, conversation_id: &str) -> StoreResult<bool>;

    /// Number of stored turns
    async fn message_count(&self, conversation_id: &str) -> StoreResult<usize>;
}
