/// 会话缓存键前缀
pub const SESSION_PREFIX: &str = "lead_session:";

/// 生成会话缓存键
pub fn session_key(session_id: &str) -> String {
    format!("{}{}", SESSION_PREFIX, session_id)
}
