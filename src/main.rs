use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use lead_relay::{
    AppState,
    cache::{MemorySessionStore, RedisSessionStore, SessionStore},
    config::Config,
    router::{RELAY_PATH, create_router},
    telegram::BotApiClient,
    utils::SystemClock,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置，缺少必需项时直接退出
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if config.debug_mode {
        tracing::info!("Running in debug mode, CORS allows any origin");
    } else {
        tracing::info!(
            "Running in production mode, CORS origin: {:?}",
            config.allowed_origin()
        );
    }

    let clock = Arc::new(SystemClock);

    // 会话存储：配置了 Redis 就用 Redis
    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str()).expect("Failed to create Redis client");
            Arc::new(RedisSessionStore::new(client, config.session_ttl_secs))
        }
        None => {
            tracing::warn!("REDIS_URL is not set, rate-limit records are kept in memory");
            Arc::new(MemorySessionStore::new(config.session_ttl_secs, clock.clone()))
        }
    };

    let messenger = Arc::new(BotApiClient::new(&config).expect("Failed to build Telegram client"));

    let state = AppState {
        config: Arc::new(config),
        sessions,
        messenger,
        clock,
    };

    let app = create_router(state.clone());

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Lead relay listening on {}{}", addr, RELAY_PATH);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
