use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, error::RelayError};

/// 缺少 bot token 或 chat id 时拒绝一切中继请求
pub async fn require_credentials(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !state.config.has_credentials() {
        tracing::error!("Bot token or chat id is missing, refusing to relay");
        return RelayError::Config.into_response();
    }

    next.run(req).await
}
