use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::warn;

use super::notification::{Notifier, Severity};
use super::transport::RelayTransport;
use super::view::{ButtonState, FormInput, FormView, SubmitEvent};
use crate::validation::{validate_contact, validate_name};

/// 成功或失败状态停留多久后恢复按钮
pub const BUTTON_REVERT_DELAY: Duration = Duration::from_secs(4);

const REQUIRED_FIELDS_TEXT: &str = "Пожалуйста, заполните обязательные поля: Имя и Telegram";
const INVALID_NAME_TEXT: &str = "Пожалуйста, введите корректное имя (только буквы)";
const INVALID_CONTACT_TEXT: &str =
    "Пожалуйста, введите корректный Telegram username (например: @username или username)";
const SUCCESS_TEXT: &str =
    "Спасибо! Ваша заявка отправлена. Мы свяжемся с вами в Telegram в ближайшее время.";
const FAILURE_TEXT: &str = "Произошла ошибка при отправке заявки. Попробуйте еще раз или напишите нам в Telegram напрямую.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 前端校验未通过，没有发起网络请求
    Rejected,
    Sent,
    Failed,
    /// 按钮处于禁用状态
    Ignored,
}

pub struct FormController<V: FormView, T: RelayTransport> {
    view: Arc<V>,
    transport: T,
    notifier: Notifier<V>,
    busy: Arc<AtomicBool>,
}

impl<V: FormView, T: RelayTransport> FormController<V, T> {
    pub fn new(view: Arc<V>, transport: T) -> Self {
        Self {
            notifier: Notifier::new(Arc::clone(&view)),
            view,
            transport,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 页面把提示的点击事件转发到这里
    pub fn notifier(&self) -> &Notifier<V> {
        &self.notifier
    }

    pub async fn handle_submit<E: SubmitEvent>(&self, event: &mut E) -> SubmitOutcome {
        event.prevent_default();

        if self.busy.load(Ordering::Acquire) {
            return SubmitOutcome::Ignored;
        }

        let input = event.form_input().trimmed();
        if let Err(text) = check_input(&input) {
            self.notifier.show(Severity::Error, text);
            return SubmitOutcome::Rejected;
        }

        if self.busy.swap(true, Ordering::AcqRel) {
            return SubmitOutcome::Ignored;
        }
        self.view.set_button(ButtonState::Submitting);

        let outcome = match self.transport.send(&input.to_payload()).await {
            Ok(response) if response.success => {
                self.view.set_button(ButtonState::Success);
                self.view.reset_form();
                self.notifier.show(Severity::Success, SUCCESS_TEXT);
                SubmitOutcome::Sent
            }
            Ok(response) => {
                warn!("Form submission error: {}", response.message);
                self.show_failure();
                SubmitOutcome::Failed
            }
            Err(e) => {
                warn!("Form submission error: {}", e);
                self.show_failure();
                SubmitOutcome::Failed
            }
        };

        self.schedule_revert();
        outcome
    }

    fn show_failure(&self) {
        self.view.set_button(ButtonState::Error);
        self.notifier.show(Severity::Error, FAILURE_TEXT);
    }

    // 无论结果如何，4 秒后恢复按钮
    fn schedule_revert(&self) {
        let view = Arc::clone(&self.view);
        let busy = Arc::clone(&self.busy);
        tokio::spawn(async move {
            tokio::time::sleep(BUTTON_REVERT_DELAY).await;
            view.set_button(ButtonState::Idle);
            busy.store(false, Ordering::Release);
        });
    }
}

fn check_input(input: &FormInput) -> Result<(), &'static str> {
    if input.name.is_empty() || input.contact.is_empty() {
        return Err(REQUIRED_FIELDS_TEXT);
    }
    if !validate_name(&input.name) {
        return Err(INVALID_NAME_TEXT);
    }
    if !validate_contact(&input.contact) {
        return Err(INVALID_CONTACT_TEXT);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;

    use super::*;
    use crate::form::notification::Notification;
    use crate::form::transport::TransportError;
    use crate::result::RelayResponse;
    use crate::routes::lead::model::LeadPayload;

    #[derive(Default)]
    struct RecordingView {
        buttons: Mutex<Vec<ButtonState>>,
        toasts: Mutex<Vec<Notification>>,
        resets: AtomicUsize,
    }

    impl RecordingView {
        fn last_button(&self) -> Option<ButtonState> {
            self.buttons.lock().unwrap().last().copied()
        }

        fn last_toast(&self) -> Option<Notification> {
            self.toasts.lock().unwrap().last().cloned()
        }
    }

    impl FormView for RecordingView {
        fn set_button(&self, state: ButtonState) {
            self.buttons.lock().unwrap().push(state);
        }

        fn show_notification(&self, notification: &Notification) {
            self.toasts.lock().unwrap().push(notification.clone());
        }

        fn remove_notification(&self, _id: u64) {}

        fn reset_form(&self) {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct StubTransport {
        reply: Option<RelayResponse>,
        sent: Mutex<Vec<LeadPayload>>,
    }

    impl StubTransport {
        fn replying(reply: Option<RelayResponse>) -> Self {
            Self {
                reply,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RelayTransport for Arc<StubTransport> {
        async fn send(&self, lead: &LeadPayload) -> Result<RelayResponse, TransportError> {
            self.sent.lock().unwrap().push(lead.clone());
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => {
                    let err = serde_json::from_str::<RelayResponse>("<html>502</html>").unwrap_err();
                    Err(TransportError::Decode(err))
                }
            }
        }
    }

    struct FakeSubmit {
        input: FormInput,
        prevented: bool,
    }

    impl FakeSubmit {
        fn new(name: &str, contact: &str, message: &str) -> Self {
            Self {
                input: FormInput {
                    name: name.into(),
                    contact: contact.into(),
                    message: message.into(),
                },
                prevented: false,
            }
        }
    }

    impl SubmitEvent for FakeSubmit {
        fn prevent_default(&mut self) {
            self.prevented = true;
        }

        fn form_input(&self) -> FormInput {
            self.input.clone()
        }
    }

    fn controller(
        reply: Option<RelayResponse>,
    ) -> (
        FormController<RecordingView, Arc<StubTransport>>,
        Arc<RecordingView>,
        Arc<StubTransport>,
    ) {
        let view = Arc::new(RecordingView::default());
        let transport = Arc::new(StubTransport::replying(reply));
        (
            FormController::new(view.clone(), transport.clone()),
            view,
            transport,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_input_shows_error_without_network() {
        let (controller, view, transport) = controller(Some(RelayResponse::success("ok")));

        let mut event = FakeSubmit::new("Иван", "", "");
        assert_eq!(controller.handle_submit(&mut event).await, SubmitOutcome::Rejected);
        assert!(event.prevented);
        assert_eq!(view.last_toast().unwrap().text, REQUIRED_FIELDS_TEXT);

        let mut event = FakeSubmit::new("R2D2", "ivan_99", "");
        controller.handle_submit(&mut event).await;
        assert_eq!(view.last_toast().unwrap().text, INVALID_NAME_TEXT);

        let mut event = FakeSubmit::new("Иван", "@_bad", "");
        controller.handle_submit(&mut event).await;
        let toast = view.last_toast().unwrap();
        assert_eq!(toast.text, INVALID_CONTACT_TEXT);
        assert_eq!(toast.severity, Severity::Error);

        assert!(transport.sent.lock().unwrap().is_empty());
        assert!(view.buttons.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_submit_cycle() {
        let (controller, view, transport) = controller(Some(RelayResponse::success("ok")));

        let mut event = FakeSubmit::new(" Иван Иванов ", "@ivan_99", "Хочу узнать цену");
        assert_eq!(controller.handle_submit(&mut event).await, SubmitOutcome::Sent);

        assert_eq!(
            *view.buttons.lock().unwrap(),
            vec![ButtonState::Submitting, ButtonState::Success]
        );
        assert_eq!(view.resets.load(Ordering::SeqCst), 1);
        assert_eq!(view.last_toast().unwrap().severity, Severity::Success);

        let sent = transport.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].name.as_deref(), Some("Иван Иванов"));

        tokio::time::sleep(BUTTON_REVERT_DELAY - Duration::from_millis(100)).await;
        assert_eq!(view.last_button(), Some(ButtonState::Success));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(view.last_button(), Some(ButtonState::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_relay_failure_shows_error_and_reverts() {
        let (controller, view, _) = controller(Some(RelayResponse::error("Некорректное имя")));

        let mut event = FakeSubmit::new("Иван", "ivan_99", "");
        assert_eq!(controller.handle_submit(&mut event).await, SubmitOutcome::Failed);
        assert_eq!(view.last_button(), Some(ButtonState::Error));
        assert_eq!(view.last_toast().unwrap().text, FAILURE_TEXT);
        assert_eq!(view.resets.load(Ordering::SeqCst), 0);

        tokio::time::sleep(BUTTON_REVERT_DELAY + Duration::from_millis(100)).await;
        assert_eq!(view.last_button(), Some(ButtonState::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_reported() {
        let (controller, view, _) = controller(None);

        let mut event = FakeSubmit::new("Иван", "ivan_99", "");
        assert_eq!(controller.handle_submit(&mut event).await, SubmitOutcome::Failed);
        assert_eq!(view.last_button(), Some(ButtonState::Error));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submits_ignored_until_button_reverts() {
        let (controller, _view, transport) = controller(Some(RelayResponse::success("ok")));

        let mut event = FakeSubmit::new("Иван", "ivan_99", "");
        controller.handle_submit(&mut event).await;
        assert_eq!(controller.handle_submit(&mut event).await, SubmitOutcome::Ignored);
        assert_eq!(transport.sent.lock().unwrap().len(), 1);

        tokio::time::sleep(BUTTON_REVERT_DELAY + Duration::from_millis(100)).await;
        assert_eq!(controller.handle_submit(&mut event).await, SubmitOutcome::Sent);
        assert_eq!(transport.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clicking_toast_dismisses_it() {
        let (controller, view, _) = controller(Some(RelayResponse::success("ok")));

        let mut event = FakeSubmit::new("Иван", "", "");
        controller.handle_submit(&mut event).await;
        let id = view.last_toast().unwrap().id;
        assert_eq!(controller.notifier().current(), Some(id));

        controller.notifier().dismiss(id);
        assert_eq!(controller.notifier().current(), None);
    }

    #[test]
    fn test_button_labels() {
        assert_eq!(ButtonState::Submitting.label(), "Отправляется...");
        assert!(ButtonState::Submitting.is_disabled());
        assert!(!ButtonState::Idle.is_disabled());
        assert_eq!(ButtonState::Error.background(), "#ef4444");
    }
}
