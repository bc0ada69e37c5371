use super::notification::Notification;
use crate::routes::lead::model::LeadPayload;

/// 提交按钮状态：idle -> submitting -> {success, error} -> idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Submitting,
    Success,
    Error,
}

impl ButtonState {
    pub fn label(self) -> &'static str {
        match self {
            ButtonState::Idle => "Отправить заявку",
            ButtonState::Submitting => "Отправляется...",
            ButtonState::Success => "✅ Заявка отправлена!",
            ButtonState::Error => "❌ Ошибка отправки",
        }
    }

    pub fn is_disabled(self) -> bool {
        self != ButtonState::Idle
    }

    pub fn background(self) -> &'static str {
        match self {
            ButtonState::Idle | ButtonState::Submitting => "#FFD700",
            ButtonState::Success => "#10b981",
            ButtonState::Error => "#ef4444",
        }
    }
}

/// 表单字段
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub name: String,
    pub contact: String,
    pub message: String,
}

impl FormInput {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    pub fn to_payload(&self) -> LeadPayload {
        LeadPayload {
            name: Some(self.name.clone()),
            contact: Some(self.contact.clone()),
            message: Some(self.message.clone()),
        }
    }
}

/// 页面向控制器暴露的能力
pub trait FormView: Send + Sync + 'static {
    fn set_button(&self, state: ButtonState);

    fn show_notification(&self, notification: &Notification);

    fn remove_notification(&self, id: u64);

    fn reset_form(&self);
}

/// 一次表单提交事件
pub trait SubmitEvent {
    /// 阻止浏览器默认的页面跳转
    fn prevent_default(&mut self);

    fn form_input(&self) -> FormInput;
}
