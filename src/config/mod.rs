use std::env;
use std::time::Duration;

const DEFAULT_RATE_LIMIT_SECONDS: u64 = 30;
const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1000;
const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_SECONDS: u64 = 86_400;
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub chat_id: String,
    pub site_domain: Option<String>,
    pub site_name: String,
    pub rate_limit_seconds: u64,
    pub max_message_length: usize,
    pub debug_mode: bool,
    pub log_submissions: bool,
    pub server_host: String,
    pub server_port: u16,
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub telegram_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源解析配置，空值视为未设置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        // 只有字面量 true 才算开启
        let flag = |key: &str| read(key).is_some_and(|value| value.eq_ignore_ascii_case("true"));

        let bot_token = read("BOT_TOKEN")
            .or_else(|| read("TELEGRAM_BOT_TOKEN"))
            .ok_or(ConfigError::MissingVar("BOT_TOKEN"))?;
        let chat_id = read("CHAT_ID")
            .or_else(|| read("TELEGRAM_CHAT_ID"))
            .ok_or(ConfigError::MissingVar("CHAT_ID"))?;

        Ok(Config {
            bot_token,
            chat_id,
            site_domain: read("SITE_DOMAIN"),
            site_name: read("SITE_NAME").unwrap_or_default(),
            rate_limit_seconds: read("RATE_LIMIT_SECONDS")
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_RATE_LIMIT_SECONDS),
            max_message_length: read("MAX_MESSAGE_LENGTH")
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_MAX_MESSAGE_LENGTH),
            debug_mode: flag("DEBUG_MODE"),
            log_submissions: flag("LOG_SUBMISSIONS"),
            server_host: read("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.into()),
            server_port: read("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            redis_url: read("REDIS_URL"),
            session_ttl_secs: read("SESSION_TTL_SECONDS")
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_SESSION_TTL_SECONDS),
            telegram_api_url: read("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.into()),
        })
    }

    pub fn has_credentials(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }

    /// 生产模式下唯一允许的跨域来源
    pub fn allowed_origin(&self) -> Option<String> {
        self.site_domain
            .as_deref()
            .map(|domain| format!("https://{}", domain))
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_seconds)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&[("BOT_TOKEN", "123:abc"), ("CHAT_ID", "-100200")]).unwrap();
        assert_eq!(config.rate_limit_seconds, 30);
        assert_eq!(config.max_message_length, 1000);
        assert!(!config.debug_mode);
        assert!(!config.log_submissions);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.telegram_api_url, "https://api.telegram.org");
        assert!(config.redis_url.is_none());
        assert!(config.has_credentials());
    }

    #[test]
    fn test_missing_token_is_startup_error() {
        let err = load(&[("CHAT_ID", "-100200")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("BOT_TOKEN")));

        let err = load(&[("BOT_TOKEN", "123:abc"), ("CHAT_ID", "   ")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("CHAT_ID")));
    }

    #[test]
    fn test_telegram_prefixed_keys_accepted() {
        let config = load(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "42"),
        ])
        .unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.chat_id, "42");
    }

    #[test]
    fn test_numeric_and_flag_parsing() {
        let config = load(&[
            ("BOT_TOKEN", "t"),
            ("CHAT_ID", "c"),
            ("RATE_LIMIT_SECONDS", "0"),
            ("MAX_MESSAGE_LENGTH", "abc"),
            ("DEBUG_MODE", "TRUE"),
            ("LOG_SUBMISSIONS", "1"),
            ("SITE_DOMAIN", "leadboost.example"),
        ])
        .unwrap();
        assert_eq!(config.rate_limit_seconds, 30);
        assert_eq!(config.max_message_length, 1000);
        assert!(config.debug_mode);
        assert!(!config.log_submissions);
        assert_eq!(
            config.allowed_origin().as_deref(),
            Some("https://leadboost.example")
        );
    }
}
