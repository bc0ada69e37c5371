/// 缓存数据模型

// 会话缓存模型
pub mod session;

pub use session::CachedSession;
