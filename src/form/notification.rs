use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::view::FormView;

pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    pub fn color(self) -> &'static str {
        match self {
            Severity::Success => "#10b981",
            Severity::Error => "#ef4444",
            Severity::Info => "#3b82f6",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub text: String,
}

/// 同一时间只显示一条提示，5 秒后或点击时消失
pub struct Notifier<V: FormView> {
    view: Arc<V>,
    current: Arc<Mutex<Option<u64>>>,
    next_id: AtomicU64,
}

impl<V: FormView> Notifier<V> {
    pub fn new(view: Arc<V>) -> Self {
        Self {
            view,
            current: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(1),
        }
    }

    /// 显示新提示并替换掉旧的，返回提示 ID
    pub fn show(&self, severity: Severity, text: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(id);
        if let Some(previous) = previous {
            self.view.remove_notification(previous);
        }

        self.view.show_notification(&Notification {
            id,
            severity,
            text: text.into(),
        });

        let view = Arc::clone(&self.view);
        let current = Arc::clone(&self.current);
        tokio::spawn(async move {
            tokio::time::sleep(NOTIFICATION_TIMEOUT).await;
            dismiss_if_current(view.as_ref(), &current, id);
        });

        id
    }

    /// 用户点击提示
    pub fn dismiss(&self, id: u64) {
        dismiss_if_current(self.view.as_ref(), &self.current, id);
    }

    pub fn current(&self) -> Option<u64> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// 已被替换或已关闭的提示不再处理
fn dismiss_if_current<V: FormView>(view: &V, current: &Mutex<Option<u64>>, id: u64) {
    let mut current = current.lock().unwrap_or_else(PoisonError::into_inner);
    if *current == Some(id) {
        *current = None;
        drop(current);
        view.remove_notification(id);
    }
}
