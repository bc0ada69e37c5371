use axum::Json;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::result::RelayResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BadRequestKind {
    #[error("malformed JSON body")]
    MalformedJson,
    #[error("name or contact is missing")]
    MissingField,
    #[error("invalid name")]
    InvalidName,
    #[error("invalid Telegram username")]
    InvalidContact,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("bot token or chat id is not configured")]
    Config,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("rate limited, {remaining_secs}s of {window_secs}s window left")]
    RateLimited { remaining_secs: u64, window_secs: u64 },
    #[error("bad request: {0}")]
    BadRequest(#[from] BadRequestKind),
    #[error("Telegram API unreachable: {0}")]
    UpstreamUnreachable(String),
    #[error("Telegram API error: {detail}")]
    UpstreamRejected { detail: String, debug: bool },
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Config
            | RelayError::UpstreamUnreachable(_)
            | RelayError::UpstreamRejected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// 返回给浏览器的提示，只有调试模式才暴露上游细节
    pub fn user_message(&self) -> String {
        match self {
            RelayError::Config => "Ошибка конфигурации сервера".into(),
            RelayError::MethodNotAllowed => "Метод не поддерживается".into(),
            RelayError::RateLimited {
                remaining_secs,
                window_secs,
            } => format!(
                "Слишком много запросов. Попробуйте через {} сек. (не чаще одного раза в {} секунд)",
                remaining_secs, window_secs
            ),
            RelayError::BadRequest(kind) => match kind {
                BadRequestKind::MalformedJson => "Некорректный формат данных".into(),
                BadRequestKind::MissingField => "Имя и Telegram обязательны".into(),
                BadRequestKind::InvalidName => "Некорректное имя".into(),
                BadRequestKind::InvalidContact => "Некорректный Telegram username".into(),
            },
            RelayError::UpstreamUnreachable(_) => "Ошибка отправки сообщения".into(),
            RelayError::UpstreamRejected { detail, debug: true } => {
                format!("Telegram API error: {}", detail)
            }
            RelayError::UpstreamRejected { debug: false, .. } => {
                "Ошибка отправки в Telegram".into()
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(RelayResponse::error(self.user_message()));

        match self {
            RelayError::RateLimited { remaining_secs, .. } => (
                status,
                [(header::RETRY_AFTER, remaining_secs.to_string())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}
