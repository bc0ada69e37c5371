// 会话缓存模块
// 每个浏览器会话只保存最近一次成功提交的时间戳

use async_trait::async_trait;

pub mod keys;
pub mod memory;
pub mod models;
pub mod operations;

pub use memory::MemorySessionStore;
pub use models::CachedSession;
pub use operations::RedisSessionStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("session record is corrupted: {0}")]
    Serde(#[from] serde_json::Error),
}

/// 会话存储：session id -> 最近一次提交时间
///
/// 读取与写入之间没有原子性保证，同一会话的并发请求可能同时通过检查。
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn last_submission(&self, session_id: &str) -> Result<Option<i64>, StoreError>;

    async fn record_submission(&self, session_id: &str, timestamp: i64) -> Result<(), StoreError>;
}
