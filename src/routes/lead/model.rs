use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::BadRequestKind;
use crate::utils::escape_html;
use crate::validation::{normalize_contact, validate_contact, validate_name};

pub const TRUNCATION_MARKER: &str = "...";
pub const MESSAGE_PLACEHOLDER: &str = "Не указано";

/// 表单提交的原始 JSON
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LeadPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 通过校验的一次提交，只在当前请求内存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    /// 不带 `@` 的用户名
    pub handle: String,
    pub message: String,
}

impl Submission {
    /// 只接受 JSON 对象，数组、null 等一律视为格式错误
    pub fn parse(body: &[u8]) -> Result<Self, BadRequestKind> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| BadRequestKind::MalformedJson)?;
        if !value.is_object() {
            return Err(BadRequestKind::MalformedJson);
        }
        let payload: LeadPayload =
            serde_json::from_value(value).map_err(|_| BadRequestKind::MalformedJson)?;
        Self::from_payload(payload)
    }

    pub fn from_payload(payload: LeadPayload) -> Result<Self, BadRequestKind> {
        let field = |value: Option<String>| value.unwrap_or_default().trim().to_string();
        let name = field(payload.name);
        let contact = field(payload.contact);
        let message = field(payload.message);

        if name.is_empty() || contact.is_empty() {
            return Err(BadRequestKind::MissingField);
        }
        if !validate_name(&name) {
            return Err(BadRequestKind::InvalidName);
        }
        if !validate_contact(&contact) {
            return Err(BadRequestKind::InvalidContact);
        }

        Ok(Submission {
            handle: normalize_contact(&contact).to_string(),
            name,
            message,
        })
    }
}

/// 转义后按字符截断，超长时追加省略标记
///
/// 截断点落在 `&...;` 实体内部时退到 `&` 之前，否则 Telegram 无法解析 HTML。
pub fn sanitize_message(message: &str, max_len: usize) -> String {
    let escaped = escape_html(message);
    if escaped.chars().count() <= max_len {
        return escaped;
    }

    let mut truncated: String = escaped.chars().take(max_len).collect();
    if let Some(amp) = truncated.rfind('&') {
        if !truncated[amp..].contains(';') {
            truncated.truncate(amp);
        }
    }
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// 发往 Telegram 的通知内容（HTML parse mode）
pub struct LeadMessage<'a> {
    pub submission: &'a Submission,
    pub max_message_length: usize,
    pub site_name: &'a str,
    pub client_ip: &'a str,
    pub received_at: DateTime<Local>,
}

impl LeadMessage<'_> {
    pub fn render(&self) -> String {
        let message = if self.submission.message.is_empty() {
            MESSAGE_PLACEHOLDER.to_string()
        } else {
            sanitize_message(&self.submission.message, self.max_message_length)
        };

        let mut text = String::from("🚀 <b>Новая заявка с сайта LeadBoost!</b>\n\n");
        text.push_str(&format!(
            "👤 <b>Имя:</b> {}\n",
            escape_html(&self.submission.name)
        ));
        text.push_str(&format!(
            "📱 <b>Telegram:</b> @{}\n",
            escape_html(&self.submission.handle)
        ));
        text.push_str(&format!("💬 <b>Сообщение:</b> {}\n\n", message));
        text.push_str(&format!(
            "📅 <b>Дата:</b> {}\n",
            self.received_at.format("%d.%m.%Y %H:%M:%S")
        ));
        text.push_str(&format!(
            "🌐 <b>Источник:</b> {}\n",
            escape_html(self.site_name)
        ));
        text.push_str(&format!("🔗 <b>IP:</b> {}", escape_html(self.client_ip)));
        text
    }
}
