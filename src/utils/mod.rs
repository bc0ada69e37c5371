use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};

use axum::http::HeaderMap;
use chrono::{DateTime, Local, TimeZone};

/// 秒级时间源，测试中可替换
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// 手动推进的时钟
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// 把 unix 时间戳转换为服务器本地时间
pub fn local_time(timestamp: i64) -> DateTime<Local> {
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .unwrap_or_else(Local::now)
}

/// 解析请求方 IP：优先 X-Forwarded-For 的第一个地址，其次连接地址
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let remote_ip = peer.map(|addr| addr.ip().to_string());

    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').map(str::trim).find(|ip| !ip.is_empty()))
        .or(remote_ip.as_deref())
        .unwrap_or("unknown")
        .to_string()
}

/// HTML 实体转义，单引号按 `&#039;` 输出
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
