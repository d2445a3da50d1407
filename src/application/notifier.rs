//! Desktop notifier facade
//!
//! [`DesktopNotifier`] is the public entry point. It picks the identifier a
//! notification is shown under, delegates to the active backend, keeps the
//! [`DispatchRegistry`] current and runs a background task that routes backend
//! events to callbacks.
//!
//! Callback routing: a notification's own callback wins; if it has none (or the
//! notification is no longer known, e.g. after a restart) the app-level handler
//! installed on the notifier receives the notification identifier instead.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OnceCell, RwLock as AsyncRwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::notification::new_identifier;
use crate::domain::{
    BackendKind, Capabilities, Capability, DispatchedNotification, Icon, Notification,
    NotifierConfig,
};
use crate::infrastructure::backend::create_backend;

use super::ports::{
    event_channel, BackendError, BackendEvent, BackendEventKind, EventSink, EventStream,
    NotificationBackend, SendRequest,
};
use super::registry::DispatchRegistry;

/// App-level handler receiving the notification identifier
pub type IdCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// App-level handler receiving the notification identifier and a second string
/// (button identifier or reply text)
pub type IdTextCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Errors from the notifier facade
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("No async runtime available: {0}")]
    Runtime(String),
}

#[derive(Clone, Default)]
struct AppHandlers {
    on_dispatched: Option<IdCallback>,
    on_cleared: Option<IdCallback>,
    on_clicked: Option<IdCallback>,
    on_dismissed: Option<IdCallback>,
    on_button_pressed: Option<IdTextCallback>,
    on_replied: Option<IdTextCallback>,
}

/// Builder for [`DesktopNotifier`]
#[derive(Debug, Clone)]
pub struct DesktopNotifierBuilder {
    app_name: String,
    app_icon: Option<Icon>,
    notification_limit: Option<usize>,
    default_timeout: Option<Duration>,
    backend: BackendKind,
}

impl DesktopNotifierBuilder {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            app_icon: None,
            notification_limit: None,
            default_timeout: None,
            backend: BackendKind::Auto,
        }
    }

    /// Builder preloaded from configuration
    pub fn from_config(config: &NotifierConfig) -> Self {
        Self {
            app_name: config.app_name_or_default().to_string(),
            app_icon: config.app_icon_or_default(),
            notification_limit: config.notification_limit_or_default(),
            default_timeout: config.default_timeout_or_default().map(|t| t.as_std()),
            backend: config.backend_or_default(),
        }
    }

    /// Icon for notifications that do not set one
    pub fn app_icon(mut self, icon: impl Into<Icon>) -> Self {
        self.app_icon = Some(icon.into());
        self
    }

    /// Maximum number of notifications kept on screen. The oldest is cleared to
    /// make room for a new one.
    pub fn notification_limit(mut self, limit: usize) -> Self {
        self.notification_limit = (limit > 0).then_some(limit);
        self
    }

    /// Timeout for notifications that do not set one
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Build with the platform backend. Must be called within a tokio runtime.
    pub fn build(self) -> Result<DesktopNotifier, DispatchError> {
        let kind = self.backend;
        let app_name = self.app_name.clone();
        self.build_with(move |sink| create_backend(kind, &app_name, sink))
    }

    /// Build with a caller-supplied backend. `factory` receives the sink the
    /// backend must push its events onto. Must be called within a tokio runtime.
    pub fn build_with<F>(self, factory: F) -> Result<DesktopNotifier, DispatchError>
    where
        F: FnOnce(EventSink) -> Result<Box<dyn NotificationBackend>, BackendError>,
    {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| DispatchError::Runtime(e.to_string()))?;

        let (sink, events) = event_channel();
        let backend = factory(sink)?;
        debug!(backend = backend.name(), app_name = %self.app_name, "Notification backend ready");

        let inner = Arc::new(Inner {
            app_name: self.app_name,
            app_icon: RwLock::new(self.app_icon),
            notification_limit: self.notification_limit,
            default_timeout: self.default_timeout,
            backend,
            registry: Mutex::new(DispatchRegistry::new()),
            handlers: RwLock::new(AppHandlers::default()),
            did_request_authorisation: AsyncMutex::new(false),
            capabilities: OnceCell::new(),
            sending: AsyncRwLock::new(()),
        });

        let event_task = runtime.spawn(dispatch_events(Arc::downgrade(&inner), events));

        Ok(DesktopNotifier { inner, event_task })
    }
}

/// Cross-platform desktop notification dispatcher
///
/// Sending does not need the event task, but callbacks only fire while the tokio
/// runtime the notifier was built in keeps running.
pub struct DesktopNotifier {
    inner: Arc<Inner>,
    event_task: JoinHandle<()>,
}

struct Inner {
    app_name: String,
    app_icon: RwLock<Option<Icon>>,
    notification_limit: Option<usize>,
    default_timeout: Option<Duration>,
    backend: Box<dyn NotificationBackend>,
    registry: Mutex<DispatchRegistry>,
    handlers: RwLock<AppHandlers>,
    did_request_authorisation: AsyncMutex<bool>,
    capabilities: OnceCell<Capabilities>,
    /// Held shared by sends until the registry knows the new notification, and
    /// exclusively while an event is routed.
    sending: AsyncRwLock<()>,
}

impl DesktopNotifier {
    /// Notifier with the platform backend and default settings.
    /// Must be called within a tokio runtime.
    pub fn new(app_name: impl Into<String>) -> Result<Self, DispatchError> {
        Self::builder(app_name).build()
    }

    pub fn builder(app_name: impl Into<String>) -> DesktopNotifierBuilder {
        DesktopNotifierBuilder::new(app_name)
    }

    /// Notifier configured from a [`NotifierConfig`]
    pub fn from_config(config: &NotifierConfig) -> Result<Self, DispatchError> {
        DesktopNotifierBuilder::from_config(config).build()
    }

    pub fn app_name(&self) -> &str {
        &self.inner.app_name
    }

    pub fn app_icon(&self) -> Option<Icon> {
        self.inner.app_icon.read().clone()
    }

    pub fn set_app_icon(&self, icon: Option<Icon>) {
        *self.inner.app_icon.write() = icon;
    }

    /// Name of the active backend
    pub fn backend_name(&self) -> &'static str {
        self.inner.backend.name()
    }

    /// Request authorisation to send notifications.
    ///
    /// Called automatically before the first notification is sent. On some
    /// platforms the first call shows a prompt to the user.
    pub async fn request_authorisation(&self) -> Result<bool, DispatchError> {
        self.inner.request_authorisation().await
    }

    /// Whether notifications are currently permitted
    pub async fn has_authorisation(&self) -> Result<bool, DispatchError> {
        Ok(self.inner.backend.has_authorisation().await?)
    }

    /// Send a notification.
    ///
    /// Even a successfully dispatched notification may not be displayed, e.g. when
    /// "do not disturb" is active.
    ///
    /// # Returns
    /// The notification together with the identifier it is shown under
    pub async fn send_notification(
        &self,
        notification: Notification,
    ) -> Result<DispatchedNotification, DispatchError> {
        self.inner.dispatch(notification, None).await
    }

    /// Convenience wrapper around [`send_notification`](Self::send_notification)
    pub async fn send(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<DispatchedNotification, DispatchError> {
        self.send_notification(Notification::new(title, message))
            .await
    }

    /// Show `notification` in place of a previously dispatched one, keeping its
    /// identifier. Falls back to a plain send if `previous` is no longer shown.
    pub async fn replace(
        &self,
        previous: &DispatchedNotification,
        notification: Notification,
    ) -> Result<DispatchedNotification, DispatchError> {
        let known = self.inner.registry.lock().contains(previous.identifier());
        let replaces = known.then(|| previous.identifier().to_string());
        self.inner.dispatch(notification, replaces).await
    }

    /// Identifiers of notifications currently shown for this app
    pub async fn current_notifications(&self) -> Vec<String> {
        self.inner.current_notifications().await
    }

    /// Look up a displayed notification
    pub fn notification(&self, identifier: &str) -> Option<DispatchedNotification> {
        self.inner.registry.lock().get(identifier).cloned()
    }

    /// Remove a notification from the notification center
    pub async fn clear(&self, identifier: &str) -> Result<(), DispatchError> {
        self.inner.clear(identifier).await
    }

    /// Remove all notifications of this app from the notification center
    pub async fn clear_all(&self) -> Result<(), DispatchError> {
        self.inner.clear_all().await
    }

    /// Functionality supported by the backend. Queried once, then cached.
    pub async fn capabilities(&self) -> Result<Capabilities, DispatchError> {
        Ok(self.inner.capabilities().await?.clone())
    }

    /// Fallback for notifications without their own `on_dispatched`
    pub fn on_dispatched(&self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.inner.handlers.write().on_dispatched = Some(Arc::new(handler));
    }

    /// Fallback for notifications without their own `on_cleared`
    pub fn on_cleared(&self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.inner.handlers.write().on_cleared = Some(Arc::new(handler));
    }

    /// Fallback for notifications without their own `on_clicked`
    pub fn on_clicked(&self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.inner.handlers.write().on_clicked = Some(Arc::new(handler));
    }

    /// Fallback for notifications without their own `on_dismissed`
    pub fn on_dismissed(&self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.inner.handlers.write().on_dismissed = Some(Arc::new(handler));
    }

    /// Fallback for buttons without their own `on_pressed`.
    /// Receives `(notification_identifier, button_identifier)`.
    pub fn on_button_pressed(&self, handler: impl Fn(&str, &str) + Send + Sync + 'static) {
        self.inner.handlers.write().on_button_pressed = Some(Arc::new(handler));
    }

    /// Fallback for reply fields without their own `on_replied`.
    /// Receives `(notification_identifier, reply_text)`.
    pub fn on_replied(&self, handler: impl Fn(&str, &str) + Send + Sync + 'static) {
        self.inner.handlers.write().on_replied = Some(Arc::new(handler));
    }
}

impl Drop for DesktopNotifier {
    fn drop(&mut self) {
        self.event_task.abort();
    }
}

impl Inner {
    async fn request_authorisation(&self) -> Result<bool, DispatchError> {
        let mut asked = self.did_request_authorisation.lock().await;
        *asked = true;
        Ok(self.backend.request_authorisation().await?)
    }

    /// Ask for authorisation once. Concurrent first sends wait for the same
    /// request instead of prompting twice.
    async fn ensure_authorisation(&self) {
        let mut asked = self.did_request_authorisation.lock().await;
        if *asked {
            return;
        }
        *asked = true;

        match self.backend.request_authorisation().await {
            Ok(true) => debug!("Authorised to send notifications"),
            Ok(false) => info!("Not authorised to send notifications, sending anyway"),
            Err(e) => warn!(error = %e, "Requesting notification authorisation failed"),
        }
    }

    async fn capabilities(&self) -> Result<&Capabilities, BackendError> {
        self.capabilities
            .get_or_try_init(|| async { self.backend.capabilities().await })
            .await
    }

    async fn supports(&self, capability: Capability) -> bool {
        match self.capabilities().await {
            Ok(capabilities) => capabilities.contains(capability),
            Err(e) => {
                warn!(error = %e, ?capability, "Could not query backend capabilities");
                false
            }
        }
    }

    async fn dispatch(
        self: &Arc<Self>,
        notification: Notification,
        replaces: Option<String>,
    ) -> Result<DispatchedNotification, DispatchError> {
        // The user may change settings at any time, so we send regardless.
        self.ensure_authorisation().await;

        let identifier = match &replaces {
            Some(previous) => previous.clone(),
            None => {
                let in_use = self.registry.lock().contains(notification.identifier());
                if in_use {
                    new_identifier()
                } else {
                    notification.identifier().to_string()
                }
            }
        };

        if replaces.is_none() {
            self.make_room().await;
        }

        let app_icon = self.app_icon.read().clone();
        let request = SendRequest {
            identifier: &identifier,
            notification: &notification,
            replaces: replaces.as_deref(),
            app_icon: app_icon.as_ref(),
        };

        // Events the backend emits while sending are routed once the registry
        // holds the notification.
        let sending = self.sending.read().await;

        if let Err(e) = self.backend.send(request).await {
            // Notifications fail for many reasons (no session bus, headless session).
            warn!(
                identifier = %identifier,
                backend = self.backend.name(),
                error = %e,
                "Notification failed"
            );
            return Err(e.into());
        }
        debug!(identifier = %identifier, backend = self.backend.name(), "Notification sent");

        let dispatched = DispatchedNotification::new(identifier.clone(), notification);
        let generation = self.registry.lock().insert(dispatched.clone());
        drop(sending);

        let own = dispatched.notification().handlers().on_dispatched.clone();
        match own {
            Some(callback) => invoke("on_dispatched", &identifier, || callback()),
            None => {
                let fallback = self.handlers.read().on_dispatched.clone();
                if let Some(callback) = fallback {
                    invoke("on_dispatched", &identifier, || callback(&identifier));
                }
            }
        }

        if let Some(timeout) = dispatched.notification().timeout().or(self.default_timeout) {
            if self.supports(Capability::Timeout).await {
                self.arm_timeout(identifier, generation, timeout);
            } else {
                debug!(
                    identifier = %identifier,
                    backend = self.backend.name(),
                    "Backend cannot withdraw notifications, timeout ignored"
                );
            }
        }

        Ok(dispatched)
    }

    /// Clear the oldest notifications until a new one fits under the limit
    async fn make_room(&self) {
        let Some(limit) = self.notification_limit else {
            return;
        };

        loop {
            let oldest = {
                let registry = self.registry.lock();
                if registry.len() < limit {
                    None
                } else {
                    registry.oldest().map(str::to_string)
                }
            };
            let Some(identifier) = oldest else {
                break;
            };

            debug!(identifier = %identifier, limit, "Notification limit reached, clearing oldest");
            if let Err(e) = self.clear(&identifier).await {
                warn!(identifier = %identifier, error = %e, "Could not clear notification");
                self.registry.lock().remove(&identifier);
            }
        }
    }

    fn arm_timeout(self: &Arc<Self>, identifier: String, generation: u64, timeout: Duration) {
        let inner = Arc::downgrade(self);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;

            let Some(inner) = inner.upgrade() else {
                return;
            };
            // A replacement under the same identifier has its own timer.
            let removed = inner
                .registry
                .lock()
                .remove_generation(&identifier, generation);
            let Some(dispatched) = removed else {
                return;
            };

            debug!(identifier = %identifier, ?timeout, "Notification timed out");
            if let Err(e) = inner.backend.clear(&identifier).await {
                warn!(identifier = %identifier, error = %e, "Could not withdraw timed out notification");
            }
            if inner.supports(Capability::OnCleared).await {
                inner.fire_cleared(&dispatched);
            }
        });
    }

    async fn current_notifications(&self) -> Vec<String> {
        let registered = self.registry.lock().identifiers();

        match self.backend.delivered().await {
            Ok(Some(delivered)) => registered
                .into_iter()
                .filter(|id| delivered.contains(id))
                .collect(),
            Ok(None) => registered,
            Err(e) => {
                warn!(error = %e, "Could not list delivered notifications");
                registered
            }
        }
    }

    async fn clear(&self, identifier: &str) -> Result<(), DispatchError> {
        self.backend.clear(identifier).await?;

        let removed = self.registry.lock().remove(identifier);
        if let Some(dispatched) = removed {
            if self.supports(Capability::OnCleared).await {
                self.fire_cleared(&dispatched);
            }
        }
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), DispatchError> {
        self.backend.clear_all().await?;

        let removed = self.registry.lock().drain();
        if !removed.is_empty() && self.supports(Capability::OnCleared).await {
            for dispatched in &removed {
                self.fire_cleared(dispatched);
            }
        }
        Ok(())
    }

    fn fire_cleared(&self, dispatched: &DispatchedNotification) {
        let identifier = dispatched.identifier();
        match dispatched.notification().handlers().on_cleared.clone() {
            Some(callback) => invoke("on_cleared", identifier, || callback()),
            None => {
                let fallback = self.handlers.read().on_cleared.clone();
                if let Some(callback) = fallback {
                    invoke("on_cleared", identifier, || callback(identifier));
                }
            }
        }
    }

    /// Route one backend event to the notification's callback or the app-level
    /// fallback. The registry entry is removed first.
    fn route(&self, event: BackendEvent) {
        let BackendEvent { identifier, kind } = event;
        let dispatched = self.registry.lock().remove(&identifier);
        let notification = dispatched.as_ref().map(DispatchedNotification::notification);
        let fallback = self.handlers.read().clone();
        let id = identifier.as_str();

        match kind {
            BackendEventKind::Clicked => {
                match notification.and_then(|n| n.handlers().on_clicked.clone()) {
                    Some(callback) => invoke("on_clicked", id, || callback()),
                    None => {
                        if let Some(callback) = fallback.on_clicked {
                            invoke("on_clicked", id, || callback(id));
                        }
                    }
                }
            }
            BackendEventKind::Dismissed => {
                match notification.and_then(|n| n.handlers().on_dismissed.clone()) {
                    Some(callback) => invoke("on_dismissed", id, || callback()),
                    None => {
                        if let Some(callback) = fallback.on_dismissed {
                            invoke("on_dismissed", id, || callback(id));
                        }
                    }
                }
            }
            BackendEventKind::ButtonPressed(button) => {
                let own = notification
                    .and_then(|n| n.button(&button))
                    .and_then(|b| b.pressed_handler());
                match own {
                    Some(callback) => invoke("on_pressed", id, || callback()),
                    None => {
                        if let Some(callback) = fallback.on_button_pressed {
                            invoke("on_button_pressed", id, || callback(id, &button));
                        }
                    }
                }
            }
            BackendEventKind::Replied(text) => {
                let own = notification
                    .and_then(|n| n.reply_field())
                    .and_then(|field| field.replied_handler());
                match own {
                    Some(callback) => invoke("on_replied", id, || callback(&text)),
                    None => {
                        if let Some(callback) = fallback.on_replied {
                            invoke("on_replied", id, || callback(id, &text));
                        }
                    }
                }
            }
            BackendEventKind::Closed(reason) => {
                debug!(identifier = %id, ?reason, "Notification closed");
            }
        }
    }
}

async fn dispatch_events(inner: Weak<Inner>, mut events: EventStream) {
    while let Some(event) = events.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        debug!(identifier = %event.identifier, kind = ?event.kind, "Backend event");
        let _routing = inner.sending.write().await;
        inner.route(event);
    }
}

/// Run a user callback. A panicking callback is logged, not propagated.
fn invoke(callback: &'static str, identifier: &str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        warn!(identifier = %identifier, callback, "Notification callback panicked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Capability;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counters {
        auth_requests: AtomicUsize,
        sends: AtomicUsize,
        capability_queries: AtomicUsize,
    }

    struct MockBackend {
        counters: Arc<Counters>,
    }

    #[async_trait]
    impl NotificationBackend for MockBackend {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn request_authorisation(&self) -> Result<bool, BackendError> {
            self.counters.auth_requests.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(true)
        }

        async fn has_authorisation(&self) -> Result<bool, BackendError> {
            Ok(true)
        }

        async fn send(&self, _request: SendRequest<'_>) -> Result<(), BackendError> {
            self.counters.sends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn clear(&self, _identifier: &str) -> Result<(), BackendError> {
            Ok(())
        }

        async fn clear_all(&self) -> Result<(), BackendError> {
            Ok(())
        }

        async fn capabilities(&self) -> Result<Capabilities, BackendError> {
            self.counters.capability_queries.fetch_add(1, Ordering::SeqCst);
            Ok(Capabilities::from([Capability::Title]))
        }
    }

    fn notifier(builder: DesktopNotifierBuilder) -> (DesktopNotifier, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let backend_counters = Arc::clone(&counters);
        let notifier = builder
            .build_with(move |_sink| {
                Ok(Box::new(MockBackend {
                    counters: backend_counters,
                }) as Box<dyn NotificationBackend>)
            })
            .unwrap();
        (notifier, counters)
    }

    #[test]
    fn build_outside_runtime_fails() {
        let result = DesktopNotifierBuilder::new("test").build_with(|_sink| {
            Err(BackendError::Unavailable("not reached".to_string()))
        });
        assert!(matches!(result, Err(DispatchError::Runtime(_))));
    }

    #[tokio::test]
    async fn authorisation_is_requested_once_for_concurrent_sends() {
        let (notifier, counters) = notifier(DesktopNotifierBuilder::new("test"));

        let (a, b) = tokio::join!(notifier.send("a", "a"), notifier.send("b", "b"));
        a.unwrap();
        b.unwrap();
        notifier.send("c", "c").await.unwrap();

        assert_eq!(counters.auth_requests.load(Ordering::SeqCst), 1);
        assert_eq!(counters.sends.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn explicit_request_skips_implicit_one() {
        let (notifier, counters) = notifier(DesktopNotifierBuilder::new("test"));

        assert!(notifier.request_authorisation().await.unwrap());
        notifier.send("a", "a").await.unwrap();

        assert_eq!(counters.auth_requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn capabilities_are_cached() {
        let (notifier, counters) = notifier(DesktopNotifierBuilder::new("test"));

        let first = notifier.capabilities().await.unwrap();
        let second = notifier.capabilities().await.unwrap();

        assert_eq!(first, second);
        assert!(first.contains(Capability::Title));
        assert_eq!(counters.capability_queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reused_identifier_gets_a_fresh_one() {
        let (notifier, _) = notifier(DesktopNotifierBuilder::new("test"));

        let first = notifier
            .send_notification(Notification::new("a", "a").with_identifier("same"))
            .await
            .unwrap();
        let second = notifier
            .send_notification(Notification::new("b", "b").with_identifier("same"))
            .await
            .unwrap();

        assert_eq!(first.identifier(), "same");
        assert_ne!(second.identifier(), "same");
        assert_eq!(notifier.current_notifications().await.len(), 2);
    }

    #[tokio::test]
    async fn panicking_callback_is_contained() {
        let (notifier, _) = notifier(DesktopNotifierBuilder::new("test"));
        notifier.on_dispatched(|_| panic!("boom"));

        let dispatched = notifier.send("a", "a").await.unwrap();
        assert!(notifier.notification(dispatched.identifier()).is_some());
    }

    #[tokio::test]
    async fn timeout_and_cleared_callback_need_backend_support() {
        let (notifier, _) = notifier(
            DesktopNotifierBuilder::new("test").default_timeout(Duration::from_millis(20)),
        );
        let cleared = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cleared);
        notifier.on_cleared(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let dispatched = notifier.send("a", "a").await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(notifier.notification(dispatched.identifier()).is_some());

        notifier.clear(dispatched.identifier()).await.unwrap();
        assert!(notifier.notification(dispatched.identifier()).is_none());
        assert_eq!(cleared.load(Ordering::SeqCst), 0);
    }
}
