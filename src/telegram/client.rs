use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ForwardError, Messenger};
use crate::config::Config;

pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// `sendMessage` 客户端，不实现 Debug 以免打印出 token
pub struct BotApiClient {
    http: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl BotApiClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.telegram_api_url.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
        })
    }
}

/// 解析 Bot API 应答
fn interpret_response(body: &str) -> Result<(), ForwardError> {
    match serde_json::from_str::<BotApiResponse>(body) {
        Ok(response) if response.ok => Ok(()),
        Ok(response) => Err(ForwardError::Rejected(
            response
                .description
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        )),
        Err(_) => Err(ForwardError::Rejected(UNKNOWN_ERROR.to_string())),
    }
}

#[async_trait]
impl Messenger for BotApiClient {
    async fn send_message(&self, text: &str) -> Result<(), ForwardError> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        // URL 中带有 token，错误信息里去掉
        let response = self
            .http
            .post(&self.endpoint)
            .form(&request)
            .send()
            .await
            .map_err(|e| ForwardError::Unreachable(e.without_url().to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| ForwardError::Unreachable(e.without_url().to_string()))?;

        interpret_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response_accepted() {
        assert_eq!(
            interpret_response(r#"{"ok":true,"result":{"message_id":7}}"#),
            Ok(())
        );
    }

    #[test]
    fn test_error_description_surfaced() {
        assert_eq!(
            interpret_response(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#),
            Err(ForwardError::Rejected("Bad Request: chat not found".into()))
        );
    }

    #[test]
    fn test_unparseable_body_is_rejection() {
        assert_eq!(
            interpret_response("<html>502 Bad Gateway</html>"),
            Err(ForwardError::Rejected("Unknown error".into()))
        );
        assert_eq!(
            interpret_response(r#"{"ok":false}"#),
            Err(ForwardError::Rejected("Unknown error".into()))
        );
    }

    #[test]
    fn test_endpoint_built_from_config() {
        let config = Config::from_lookup(|key| match key {
            "BOT_TOKEN" => Some("123:abc".into()),
            "CHAT_ID" => Some("42".into()),
            "TELEGRAM_API_URL" => Some("http://127.0.0.1:8081/".into()),
            _ => None,
        })
        .unwrap();
        let client = BotApiClient::new(&config).unwrap();
        assert_eq!(client.endpoint, "http://127.0.0.1:8081/bot123:abc/sendMessage");
        assert_eq!(client.chat_id, "42");
    }
}
