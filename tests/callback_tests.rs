//! Notifier facade integration tests
//!
//! Drive `DesktopNotifier` through a scripted backend that records calls and lets
//! the test inject platform events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use desktop_dispatch::{
    BackendError, BackendEvent, BackendEventKind, Button, Capabilities, Capability, CloseReason,
    DesktopNotifier, DesktopNotifierBuilder, DispatchError, EventSink, Notification,
    NotificationBackend, ReplyField, SendRequest,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Sent {
    identifier: String,
    replaces: Option<String>,
    title: String,
}

#[derive(Default)]
struct Script {
    sent: Mutex<Vec<Sent>>,
    cleared: Mutex<Vec<String>>,
    cleared_all: AtomicBool,
    fail_sends: AtomicBool,
    /// Report a click while the send is still in progress
    click_while_sending: AtomicBool,
    /// Advertise neither timeouts nor cleared callbacks
    cannot_withdraw: AtomicBool,
}

struct ScriptedBackend {
    script: Arc<Script>,
    sink: EventSink,
}

#[async_trait]
impl NotificationBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn request_authorisation(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    async fn has_authorisation(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    async fn send(&self, request: SendRequest<'_>) -> Result<(), BackendError> {
        if self.script.fail_sends.load(Ordering::SeqCst) {
            return Err(BackendError::SendFailed("no notification server".to_string()));
        }
        self.script.sent.lock().push(Sent {
            identifier: request.identifier.to_string(),
            replaces: request.replaces.map(str::to_string),
            title: request.notification.title().to_string(),
        });
        if self.script.click_while_sending.load(Ordering::SeqCst) {
            let click = BackendEvent::new(request.identifier, BackendEventKind::Clicked);
            self.sink.send(click).unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        Ok(())
    }

    async fn clear(&self, identifier: &str) -> Result<(), BackendError> {
        self.script.cleared.lock().push(identifier.to_string());
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), BackendError> {
        self.script.cleared_all.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn capabilities(&self) -> Result<Capabilities, BackendError> {
        if self.script.cannot_withdraw.load(Ordering::SeqCst) {
            return Ok(Capabilities::empty());
        }
        Ok(Capabilities::from([Capability::Timeout, Capability::OnCleared]))
    }
}

struct Harness {
    notifier: DesktopNotifier,
    script: Arc<Script>,
    sink: EventSink,
}

impl Harness {
    fn new() -> Self {
        Self::with_builder(DesktopNotifierBuilder::new("test-app"))
    }

    fn with_builder(builder: DesktopNotifierBuilder) -> Self {
        let script = Arc::new(Script::default());
        let backend_script = Arc::clone(&script);
        let mut captured = None;

        let notifier = builder
            .build_with(|sink| {
                captured = Some(sink.clone());
                Ok(Box::new(ScriptedBackend {
                    script: backend_script,
                    sink,
                }) as Box<dyn NotificationBackend>)
            })
            .unwrap();

        Self {
            notifier,
            script,
            sink: captured.unwrap(),
        }
    }

    fn emit(&self, identifier: &str, kind: BackendEventKind) {
        self.sink.send(BackendEvent::new(identifier, kind)).unwrap();
    }
}

/// Channel collecting callback invocations as strings
fn recorder() -> (mpsc::UnboundedSender<String>, mpsc::UnboundedReceiver<String>) {
    mpsc::unbounded_channel()
}

async fn next(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("callback was not called in time")
        .expect("recorder closed")
}

/// Give the event task time to drain the channel
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn click_runs_own_callback_and_forgets_notification() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();

    let dispatched = harness
        .notifier
        .send_notification(Notification::new("Hi", "there").on_clicked(move || {
            tx.send("clicked".to_string()).unwrap();
        }))
        .await
        .unwrap();

    harness.emit(dispatched.identifier(), BackendEventKind::Clicked);

    assert_eq!(next(&mut rx).await, "clicked");
    assert!(harness.notifier.notification(dispatched.identifier()).is_none());
    assert!(harness.notifier.current_notifications().await.is_empty());
}

#[tokio::test]
async fn click_without_own_callback_goes_to_app_handler() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();
    harness
        .notifier
        .on_clicked(move |id| tx.send(format!("app:{id}")).unwrap());

    let dispatched = harness.notifier.send("Hi", "there").await.unwrap();
    harness.emit(dispatched.identifier(), BackendEventKind::Clicked);

    assert_eq!(next(&mut rx).await, format!("app:{}", dispatched.identifier()));
}

#[tokio::test]
async fn unknown_identifier_goes_to_app_handler() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();
    harness
        .notifier
        .on_dismissed(move |id| tx.send(id.to_string()).unwrap());

    harness.emit("from-a-previous-run", BackendEventKind::Dismissed);

    assert_eq!(next(&mut rx).await, "from-a-previous-run");
}

#[tokio::test]
async fn second_event_for_same_notification_skips_own_callbacks() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();
    let own_tx = tx.clone();
    harness
        .notifier
        .on_dismissed(move |id| tx.send(format!("app-dismissed:{id}")).unwrap());

    let dismissed_tx = own_tx.clone();
    let dispatched = harness
        .notifier
        .send_notification(
            Notification::new("Hi", "there")
                .on_clicked(move || own_tx.send("clicked".to_string()).unwrap())
                .on_dismissed(move || dismissed_tx.send("own-dismissed".to_string()).unwrap()),
        )
        .await
        .unwrap();

    harness.emit(dispatched.identifier(), BackendEventKind::Clicked);
    harness.emit(dispatched.identifier(), BackendEventKind::Dismissed);

    assert_eq!(next(&mut rx).await, "clicked");
    assert_eq!(
        next(&mut rx).await,
        format!("app-dismissed:{}", dispatched.identifier())
    );
}

#[tokio::test]
async fn button_press_routes_to_button_or_app_handler() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();
    let app_tx = tx.clone();
    harness
        .notifier
        .on_button_pressed(move |id, button| app_tx.send(format!("app:{id}:{button}")).unwrap());

    let first = harness
        .notifier
        .send_notification(
            Notification::new("Meeting", "Join now?").with_button(
                Button::new("Join")
                    .with_identifier("join")
                    .on_pressed(move || tx.send("join".to_string()).unwrap()),
            ),
        )
        .await
        .unwrap();
    let second = harness
        .notifier
        .send_notification(
            Notification::new("Meeting", "Join now?")
                .with_button(Button::new("Later").with_identifier("later")),
        )
        .await
        .unwrap();

    harness.emit(
        first.identifier(),
        BackendEventKind::ButtonPressed("join".to_string()),
    );
    assert_eq!(next(&mut rx).await, "join");

    harness.emit(
        second.identifier(),
        BackendEventKind::ButtonPressed("later".to_string()),
    );
    assert_eq!(
        next(&mut rx).await,
        format!("app:{}:later", second.identifier())
    );
}

#[tokio::test]
async fn reply_text_reaches_reply_field() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();

    let dispatched = harness
        .notifier
        .send_notification(
            Notification::new("Chat", "How are you?").with_reply_field(
                ReplyField::new().on_replied(move |text| tx.send(text.to_string()).unwrap()),
            ),
        )
        .await
        .unwrap();

    harness.emit(
        dispatched.identifier(),
        BackendEventKind::Replied("fine, thanks".to_string()),
    );

    assert_eq!(next(&mut rx).await, "fine, thanks");
}

#[tokio::test]
async fn closed_event_forgets_notification_silently() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();
    let cleared_tx = tx.clone();
    harness
        .notifier
        .on_dismissed(move |id| tx.send(format!("dismissed:{id}")).unwrap());
    harness
        .notifier
        .on_cleared(move |id| cleared_tx.send(format!("cleared:{id}")).unwrap());

    let dispatched = harness.notifier.send("Hi", "there").await.unwrap();
    harness.emit(
        dispatched.identifier(),
        BackendEventKind::Closed(CloseReason::Expired),
    );
    settle().await;

    assert!(harness.notifier.notification(dispatched.identifier()).is_none());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn on_dispatched_fires_after_send() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();

    let dispatched = harness
        .notifier
        .send_notification(
            Notification::new("Hi", "there")
                .on_dispatched(move || tx.send("dispatched".to_string()).unwrap()),
        )
        .await
        .unwrap();

    assert_eq!(next(&mut rx).await, "dispatched");
    assert_eq!(
        harness.script.sent.lock()[0].identifier,
        dispatched.identifier()
    );
}

#[tokio::test]
async fn timeout_clears_notification() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();

    let dispatched = harness
        .notifier
        .send_notification(
            Notification::new("Hi", "there")
                .with_timeout(Duration::from_millis(50))
                .on_cleared(move || tx.send("cleared".to_string()).unwrap()),
        )
        .await
        .unwrap();

    assert_eq!(next(&mut rx).await, "cleared");
    assert_eq!(
        *harness.script.cleared.lock(),
        vec![dispatched.identifier().to_string()]
    );
    assert!(harness.notifier.current_notifications().await.is_empty());
}

#[tokio::test]
async fn default_timeout_applies_to_notifications_without_one() {
    let harness = Harness::with_builder(
        DesktopNotifierBuilder::new("test-app").default_timeout(Duration::from_millis(50)),
    );
    let (tx, mut rx) = recorder();
    harness
        .notifier
        .on_cleared(move |id| tx.send(id.to_string()).unwrap());

    let dispatched = harness.notifier.send("Hi", "there").await.unwrap();

    assert_eq!(next(&mut rx).await, dispatched.identifier());
}

#[tokio::test]
async fn replacement_keeps_identifier_and_outlives_old_timeout() {
    let harness = Harness::new();

    let first = harness
        .notifier
        .send_notification(Notification::new("Download", "10%").with_timeout(Duration::from_millis(50)))
        .await
        .unwrap();
    let second = harness
        .notifier
        .replace(&first, Notification::new("Download", "90%"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(second.identifier(), first.identifier());
    assert_eq!(second.notification().message(), "90%");
    assert!(harness.script.cleared.lock().is_empty());
    assert_eq!(
        harness.notifier.current_notifications().await,
        vec![first.identifier().to_string()]
    );

    let sent = harness.script.sent.lock().clone();
    assert_eq!(sent[1].replaces.as_deref(), Some(first.identifier()));
}

#[tokio::test]
async fn replacing_a_forgotten_notification_sends_a_new_one() {
    let harness = Harness::new();

    let first = harness.notifier.send("Download", "10%").await.unwrap();
    harness.notifier.clear(first.identifier()).await.unwrap();
    let second = harness
        .notifier
        .replace(&first, Notification::new("Download", "90%"))
        .await
        .unwrap();

    let sent = harness.script.sent.lock().clone();
    assert_eq!(sent[1].replaces, None);
    assert!(harness.notifier.notification(second.identifier()).is_some());
}

#[tokio::test]
async fn notification_limit_clears_oldest() {
    let harness =
        Harness::with_builder(DesktopNotifierBuilder::new("test-app").notification_limit(2));

    let a = harness.notifier.send("a", "a").await.unwrap();
    let b = harness.notifier.send("b", "b").await.unwrap();
    let c = harness.notifier.send("c", "c").await.unwrap();

    assert_eq!(
        *harness.script.cleared.lock(),
        vec![a.identifier().to_string()]
    );
    assert_eq!(
        harness.notifier.current_notifications().await,
        vec![b.identifier().to_string(), c.identifier().to_string()]
    );
}

#[tokio::test]
async fn clear_all_fires_cleared_for_every_notification() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();
    harness
        .notifier
        .on_cleared(move |id| tx.send(id.to_string()).unwrap());

    let a = harness.notifier.send("a", "a").await.unwrap();
    let b = harness.notifier.send("b", "b").await.unwrap();
    harness.notifier.clear_all().await.unwrap();

    assert_eq!(next(&mut rx).await, a.identifier());
    assert_eq!(next(&mut rx).await, b.identifier());
    assert!(harness.script.cleared_all.load(Ordering::SeqCst));
    assert!(harness.notifier.current_notifications().await.is_empty());
}

#[tokio::test]
async fn failed_send_is_reported_and_not_registered() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();
    harness
        .notifier
        .on_dispatched(move |id| tx.send(id.to_string()).unwrap());
    harness.script.fail_sends.store(true, Ordering::SeqCst);

    let result = harness.notifier.send("Hi", "there").await;
    settle().await;

    assert!(matches!(
        result,
        Err(DispatchError::Backend(BackendError::SendFailed(_)))
    ));
    assert!(harness.notifier.current_notifications().await.is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn app_icon_is_passed_to_backend_requests() {
    let harness = Harness::with_builder(
        DesktopNotifierBuilder::new("test-app").app_icon(desktop_dispatch::Resource::name("mail")),
    );

    assert_eq!(
        harness.notifier.app_icon(),
        Some(desktop_dispatch::Resource::name("mail"))
    );
    harness.notifier.set_app_icon(None);
    assert!(harness.notifier.app_icon().is_none());
    assert_eq!(harness.notifier.backend_name(), "scripted");
    assert_eq!(harness.notifier.app_name(), "test-app");

    harness.notifier.send("Hi", "there").await.unwrap();
    assert_eq!(harness.script.sent.lock()[0].title, "Hi");
}

#[tokio::test]
async fn panicking_click_handler_does_not_stop_event_routing() {
    let harness = Harness::new();
    let (tx, mut rx) = recorder();

    let faulty = harness
        .notifier
        .send_notification(Notification::new("First", "boom").on_clicked(|| panic!("boom")))
        .await
        .unwrap();
    let healthy = harness
        .notifier
        .send_notification(
            Notification::new("Second", "fine")
                .on_clicked(move || tx.send("second clicked".to_string()).unwrap()),
        )
        .await
        .unwrap();

    harness.emit(faulty.identifier(), BackendEventKind::Clicked);
    harness.emit(healthy.identifier(), BackendEventKind::Clicked);

    assert_eq!(next(&mut rx).await, "second clicked");
    assert!(harness.notifier.current_notifications().await.is_empty());
}

#[tokio::test]
async fn event_reported_during_send_reaches_own_callback() {
    let harness = Harness::new();
    harness
        .script
        .click_while_sending
        .store(true, Ordering::SeqCst);
    let (tx, mut rx) = recorder();
    let app_tx = tx.clone();
    harness
        .notifier
        .on_clicked(move |id| app_tx.send(format!("app:{id}")).unwrap());

    let dispatched = harness
        .notifier
        .send_notification(
            Notification::new("Hi", "there").on_clicked(move || tx.send("own".to_string()).unwrap()),
        )
        .await
        .unwrap();

    assert_eq!(next(&mut rx).await, "own");
    settle().await;
    assert!(harness.notifier.notification(dispatched.identifier()).is_none());
}

#[tokio::test]
async fn backend_that_cannot_withdraw_keeps_notifications_until_events() {
    let harness = Harness::with_builder(
        DesktopNotifierBuilder::new("test-app").default_timeout(Duration::from_millis(20)),
    );
    harness.script.cannot_withdraw.store(true, Ordering::SeqCst);
    let (tx, mut rx) = recorder();
    let cleared_tx = tx.clone();
    harness
        .notifier
        .on_cleared(move |id| cleared_tx.send(format!("cleared:{id}")).unwrap());
    harness
        .notifier
        .on_dismissed(move |id| tx.send(format!("dismissed:{id}")).unwrap());

    let first = harness.notifier.send("First", "one").await.unwrap();
    let second = harness.notifier.send("Second", "two").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(harness.script.cleared.lock().is_empty());
    assert_eq!(harness.notifier.current_notifications().await.len(), 2);

    harness.notifier.clear(first.identifier()).await.unwrap();
    harness.emit(second.identifier(), BackendEventKind::Dismissed);

    assert_eq!(
        next(&mut rx).await,
        format!("dismissed:{}", second.identifier())
    );
    assert!(harness.notifier.current_notifications().await.is_empty());
}
