use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::keys::session_key;
use crate::cache::models::CachedSession;
use crate::cache::{SessionStore, StoreError};

/// 基于 Redis 的会话存储，记录随会话 TTL 过期
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: Arc<RedisClient>,
    ttl: u64,
}

impl RedisSessionStore {
    pub fn new(redis: RedisClient, ttl: u64) -> Self {
        Self {
            redis: Arc::new(redis),
            ttl,
        }
    }

    /// 获取会话
    pub async fn get_session(&self, session_id: &str) -> Result<Option<CachedSession>, StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(session_key(session_id)).await?;

        match result {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 缓存会话
    pub async fn cache_session(&self, session: &CachedSession) -> Result<(), StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let json = serde_json::to_string(session)?;
        let _: () = conn
            .set_ex(session_key(&session.session_id), json, self.ttl)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn last_submission(&self, session_id: &str) -> Result<Option<i64>, StoreError> {
        Ok(self
            .get_session(session_id)
            .await?
            .map(|session| session.last_submission))
    }

    async fn record_submission(&self, session_id: &str, timestamp: i64) -> Result<(), StoreError> {
        self.cache_session(&CachedSession::new(session_id, timestamp, self.ttl))
            .await
    }
}
