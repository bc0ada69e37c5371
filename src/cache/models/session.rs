use serde::{Deserialize, Serialize};

/// 会话缓存数据模型
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CachedSession {
    pub session_id: String,
    pub last_submission: i64, // Unix timestamp
    pub expires_at: i64,      // Unix timestamp
}

impl CachedSession {
    pub fn new(session_id: &str, last_submission: i64, ttl: u64) -> Self {
        Self {
            session_id: session_id.to_string(),
            last_submission,
            expires_at: last_submission + ttl as i64,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}
