//! Telegram Bot API 出站通道

use async_trait::async_trait;

mod client;

pub use client::{BotApiClient, SEND_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForwardError {
    /// 网络错误或超时
    #[error("request failed: {0}")]
    Unreachable(String),
    /// Bot API 返回 ok=false 或无法解析的响应
    #[error("rejected: {0}")]
    Rejected(String),
}

/// 把格式化好的线索消息投递到目标聊天
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<(), ForwardError>;
}
