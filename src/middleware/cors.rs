use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;

/// 调试模式允许任意来源，否则只放行配置的站点域名
pub fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.debug_mode {
        tracing::debug!("Debug mode: allowing any origin");
        return layer.allow_origin(Any);
    }

    match config
        .allowed_origin()
        .and_then(|origin| HeaderValue::from_str(&origin).ok())
    {
        Some(origin) => layer.allow_origin(origin).allow_credentials(true),
        None => {
            tracing::warn!("SITE_DOMAIN is not set, cross-origin requests will be refused");
            layer
        }
    }
}
