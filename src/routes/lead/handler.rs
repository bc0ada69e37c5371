use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Json,
    body::to_bytes,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::model::{LeadMessage, Submission};
use crate::{
    AppState,
    error::{BadRequestKind, RelayError},
    result::RelayResponse,
    telegram::ForwardError,
    utils::{client_ip, local_time},
};

pub const SESSION_COOKIE: &str = "lead_session";

const SUCCESS_MESSAGE: &str = "Заявка успешно отправлена";
const MAX_BODY_BYTES: usize = 64 * 1024;

/// 接收表单提交：限流、校验、转发到 Telegram
pub async fn relay(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
) -> impl IntoResponse {
    let (session_id, jar) = ensure_session(jar, state.config.debug_mode, state.config.session_ttl());

    let response = match submit_lead(&state, &session_id, request).await {
        Ok(body) => body.into_response(),
        Err(e) => e.into_response(),
    };

    (jar, response)
}

/// 不带 CORS 预检头的 OPTIONS 请求
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}

/// 复用浏览器已有的会话，否则分配新的会话 ID；cookie 与服务端记录同寿命
fn ensure_session(jar: CookieJar, debug_mode: bool, ttl: Duration) -> (String, CookieJar) {
    let session_id = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| Uuid::parse_str(value).is_ok())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let cookie = Cookie::build((SESSION_COOKIE, session_id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!debug_mode)
        .max_age(time::Duration::seconds(ttl.as_secs() as i64));

    (session_id, jar.add(cookie))
}

async fn submit_lead(
    state: &AppState,
    session_id: &str,
    request: Request,
) -> Result<Json<RelayResponse>, RelayError> {
    let config = &state.config;
    let now = state.clock.now();

    // 限流检查在解析请求体之前
    check_rate_limit(state, session_id, now).await?;

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let ip = client_ip(request.headers(), peer);

    let body = to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|_| BadRequestKind::MalformedJson)?;
    let submission = Submission::parse(&body)?;

    let text = LeadMessage {
        submission: &submission,
        max_message_length: config.max_message_length,
        site_name: &config.site_name,
        client_ip: &ip,
        received_at: local_time(now),
    }
    .render();

    if config.debug_mode {
        info!("Debug: sending message to Telegram: {}", text);
    } else {
        debug!("Sending lead from session {} to Telegram", session_id);
    }

    state
        .messenger
        .send_message(&text)
        .await
        .map_err(|e| match e {
            ForwardError::Unreachable(reason) => {
                error!(
                    "Telegram API request failed for user {}: {}",
                    submission.name, reason
                );
                RelayError::UpstreamUnreachable(reason)
            }
            ForwardError::Rejected(detail) => {
                error!("Telegram API error: {}", detail);
                RelayError::UpstreamRejected {
                    detail,
                    debug: config.debug_mode,
                }
            }
        })?;

    // 消息已送达，写入失败也不能再报错给用户
    if let Err(e) = state.sessions.record_submission(session_id, now).await {
        warn!("Failed to record submission for session {}: {}", session_id, e);
    }

    if config.log_submissions {
        info!(
            "Form submitted successfully: {} (@{})",
            submission.name, submission.handle
        );
    }

    Ok(Json(RelayResponse::success(SUCCESS_MESSAGE)))
}

/// 同一会话在窗口期内只接受一次提交，读写非原子
async fn check_rate_limit(state: &AppState, session_id: &str, now: i64) -> Result<(), RelayError> {
    let window = state.config.rate_limit_window().as_secs();

    let last = match state.sessions.last_submission(session_id).await {
        Ok(last) => last,
        Err(e) => {
            warn!("Session store unavailable, skipping rate limit: {}", e);
            None
        }
    };

    if let Some(last) = last {
        let elapsed = (now - last).max(0) as u64;
        if elapsed < window {
            warn!("Rate limit hit for session {}", session_id);
            return Err(RelayError::RateLimited {
                remaining_secs: window - elapsed,
                window_secs: window,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_session_reused() {
        let id = Uuid::new_v4().to_string();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, id.clone()));
        let (session_id, jar) = ensure_session(jar, true, Duration::from_secs(3600));
        assert_eq!(session_id, id);
        let cookie = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(cookie.value(), id);
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }

    #[test]
    fn test_foreign_session_value_replaced() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "../../etc"));
        let (session_id, _) = ensure_session(jar, false, Duration::from_secs(60));
        assert!(Uuid::parse_str(&session_id).is_ok());
    }
}
