/// 缓存操作

// 会话缓存操作
pub mod session;

pub use session::RedisSessionStore;
