use super::{conversation_key, user_conversations_key, ConversationStore, StoreResult};
use crate::error::StoreError;
use crate::types::ConversationRecord;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Redis-backed conversation store
///
/// Turns live in a list (`RPUSH`/`LRANGE`), the user index in a set
/// (`SADD`/`SMEMBERS`). Every append refreshes `EXPIRE` on both keys.
pub struct RedisConversationStore {
    client: redis::Client,
    prefix: String,
    ttl_seconds: u64,
}

impl std::fmt::Debug for RedisConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConversationStore")
            .field("prefix", &self.prefix)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl RedisConversationStore {
    /// Create a store
    ///
    /// # Errors
    ///
    /// Returns error if the Redis URL is invalid
    pub fn new(redis_url: &str, prefix: &str, ttl_seconds: u64) -> StoreResult<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StoreError::Connection(format!("invalid Redis URL: {}", e)))?;

        Ok(Self {
            client,
            prefix: prefix.to_string(),
            ttl_seconds,
        })
    }

    async fn get_connection(&self) -> StoreResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis connection failed: {}", e)))
    }

    /// Ping the server
    ///
    /// # Errors
    ///
    /// Connection or command failure
    pub async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.get_connection().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| StoreError::Command(format!("Redis PING failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for RedisConversationStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn append(&self, conversation_id: &str, record: ConversationRecord) -> StoreResult<bool> {
        let mut conn = self.get_connection().await?;
        let key = conversation_key(&self.prefix, conversation_id);
        let user_key = user_conversations_key(&self.prefix, &record.user_id);
        let json = serde_json::to_string(&record)?;

        redis::cmd("RPUSH")
            .arg(&key)
            .arg(&json)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| StoreError::Command(format!("Redis RPUSH failed: {}", e)))?;

        redis::cmd("EXPIRE")
            .arg(&key)
            .arg(self.ttl_seconds)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| StoreError::Command(format!("Redis EXPIRE failed: {}", e)))?;

        redis::cmd("SADD")
            .arg(&user_key)
            .arg(conversation_id)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| StoreError::Command(format!("Redis SADD failed: {}", e)))?;

        redis::cmd("EXPIRE")
            .arg(&user_key)
            .arg(self.ttl_seconds)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| StoreError::Command(format!("Redis EXPIRE failed: {}", e)))?;

        debug!(conversation_id, user_id = %record.user_id, "Conversation turn stored in Redis");
        Ok(true)
    }

    async fn history(&self, conversation_id: &str) -> StoreResult<Vec<ConversationRecord>> {
        let mut conn = self.get_connection().await?;
        let key = conversation_key(&self.prefix, conversation_id);

        let raw: Vec<String> = redis::cmd("LRANGE")
            .arg(&key)
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Command(format!("Redis LRANGE failed: {}", e)))?;

        let records = raw
            .iter()
            .filter_map(|entry| match serde_json::from_str::<ConversationRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(conversation_id, error = %e, "Skipping malformed history entry");
                    None
                }
            })
            .collect();
        Ok(records)
    }

    async fn conversations_for_user(&self, user_id: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.get_connection().await?;
        let key = user_conversations_key(&self.prefix, user_id);

        let mut ids: Vec<String> = redis::cmd("SMEMBERS")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Command(format!("Redis SMEMBERS failed: {}", e)))?;
        ids.sort();
        Ok(ids)
    }

    async fn clear(&self, conversation_id: &str) -> StoreResult<bool> {
        let mut conn = self.get_connection().await?;
        let key = conversation_key(&self.prefix, conversation_id);

        let deleted: i64 = redis::cmd("DEL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Command(format!("Redis DEL failed: {}", e)))?;

        debug!(conversation_id, deleted = deleted > 0, "Conversation cleared from Redis");
        Ok(deleted > 0)
    }

    async fn message_count(&self, conversation_id: &str) -> StoreResult<usize> {
        let mut conn = self.get_connection().await?;
        let key = conversation_key(&self.prefix, conversation_id);

        let len: usize = redis::cmd("LLEN")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Command(format!("Redis LLEN failed: {}", e)))?;
        Ok(len)
    }
}
