use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::models::CachedSession;
use crate::cache::{SessionStore, StoreError};
use crate::utils::Clock;

/// 进程内会话存储，未配置 Redis 时使用
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, CachedSession>>,
    ttl: u64,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    pub fn new(ttl: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn last_submission(&self, session_id: &str) -> Result<Option<i64>, StoreError> {
        let now = self.clock.now();
        let sessions = self.sessions.read().await;

        Ok(sessions
            .get(session_id)
            .filter(|session| !session.is_expired(now))
            .map(|session| session.last_submission))
    }

    async fn record_submission(&self, session_id: &str, timestamp: i64) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;

        // 顺手清理过期记录
        sessions.retain(|_, session| !session.is_expired(now));
        sessions.insert(
            session_id.to_string(),
            CachedSession::new(session_id, timestamp, self.ttl),
        );

        Ok(())
    }
}
