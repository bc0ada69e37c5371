//! 落地页联系表单的前端控制器
//!
//! 不依赖具体渲染环境：页面通过 [`FormView`] 提供按钮、提示和重置能力，
//! 通过 [`RelayTransport`] 把线索发送到中继。

mod controller;
mod notification;
mod transport;
mod view;

pub use crate::validation::{validate_contact, validate_name};
pub use controller::{BUTTON_REVERT_DELAY, FormController, SubmitOutcome};
pub use notification::{NOTIFICATION_TIMEOUT, Notification, Notifier, Severity};
pub use transport::{HttpRelayClient, RelayTransport, TransportError};
pub use view::{ButtonState, FormInput, FormView, SubmitEvent};
