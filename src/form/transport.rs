use async_trait::async_trait;

use crate::result::RelayResponse;
use crate::routes::lead::model::LeadPayload;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relay response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 表单到中继的唯一网络调用
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, lead: &LeadPayload) -> Result<RelayResponse, TransportError>;
}

/// 通过 HTTP 调用中继，保留会话 cookie，不设置额外超时
pub struct HttpRelayClient {
    http: reqwest::Client,
    url: String,
}

impl HttpRelayClient {
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn send(&self, lead: &LeadPayload) -> Result<RelayResponse, TransportError> {
        // 非 2xx 的响应体同样是 {success, message}
        let body = self
            .http
            .post(&self.url)
            .json(lead)
            .send()
            .await?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
