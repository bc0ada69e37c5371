use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};

use crate::{
    AppState,
    middleware::{cors_layer, log_errors, require_credentials},
    routes::lead,
};

pub const RELAY_PATH: &str = "/relay";

// 中继路由：POST 提交，OPTIONS 预检，其他方法 405
fn relay_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            RELAY_PATH,
            post(lead::relay)
                .options(lead::preflight)
                .fallback(lead::method_not_allowed),
        )
        .layer(cors_layer(&state.config))
        .layer(from_fn_with_state(state.clone(), require_credentials))
}

async fn health() -> &'static str {
    "ok"
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(relay_routes(&state))
        .route("/health", get(health))
        .layer(from_fn(log_errors))
        .with_state(state)
}
