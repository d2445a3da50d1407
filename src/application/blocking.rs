//! Synchronous counterpart to [`DesktopNotifier`]
//!
//! Owns a small tokio runtime. The event task runs on the runtime's worker
//! thread, so callbacks fire even while the caller is not blocked on a call.
//! Callbacks therefore run on that worker thread, not on the caller's.

use std::time::Duration;

use tokio::runtime::{Builder, Runtime};

use crate::domain::{Capabilities, DispatchedNotification, Icon, Notification, NotifierConfig};

use super::notifier::{DesktopNotifier, DesktopNotifierBuilder, DispatchError};
use super::ports::{BackendError, EventSink, NotificationBackend};

/// Blocking desktop notifier. Must not be used from within an async context.
pub struct BlockingNotifier {
    // Dropped before the runtime so the event task is aborted while it still exists.
    notifier: DesktopNotifier,
    runtime: Runtime,
}

impl BlockingNotifier {
    /// Blocking notifier with the platform backend and default settings
    pub fn new(app_name: impl Into<String>) -> Result<Self, DispatchError> {
        Self::from_builder(DesktopNotifierBuilder::new(app_name))
    }

    pub fn from_config(config: &NotifierConfig) -> Result<Self, DispatchError> {
        Self::from_builder(DesktopNotifierBuilder::from_config(config))
    }

    /// Build the notifier inside the owned runtime
    pub fn from_builder(builder: DesktopNotifierBuilder) -> Result<Self, DispatchError> {
        let runtime = Self::runtime()?;
        let notifier = {
            let _guard = runtime.enter();
            builder.build()?
        };
        Ok(Self { notifier, runtime })
    }

    /// Build with a caller-supplied backend inside the owned runtime
    pub fn with_backend<F>(builder: DesktopNotifierBuilder, factory: F) -> Result<Self, DispatchError>
    where
        F: FnOnce(EventSink) -> Result<Box<dyn NotificationBackend>, BackendError>,
    {
        let runtime = Self::runtime()?;
        let notifier = {
            let _guard = runtime.enter();
            builder.build_with(factory)?
        };
        Ok(Self { notifier, runtime })
    }

    fn runtime() -> Result<Runtime, DispatchError> {
        Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("desktop-dispatch")
            .enable_all()
            .build()
            .map_err(|e| DispatchError::Runtime(e.to_string()))
    }

    /// The wrapped async notifier, e.g. to install app-level handlers
    pub fn notifier(&self) -> &DesktopNotifier {
        &self.notifier
    }

    pub fn app_name(&self) -> &str {
        self.notifier.app_name()
    }

    pub fn app_icon(&self) -> Option<Icon> {
        self.notifier.app_icon()
    }

    pub fn set_app_icon(&self, icon: Option<Icon>) {
        self.notifier.set_app_icon(icon)
    }

    /// See [`DesktopNotifier::request_authorisation`]
    pub fn request_authorisation(&self) -> Result<bool, DispatchError> {
        self.runtime.block_on(self.notifier.request_authorisation())
    }

    /// See [`DesktopNotifier::has_authorisation`]
    pub fn has_authorisation(&self) -> Result<bool, DispatchError> {
        self.runtime.block_on(self.notifier.has_authorisation())
    }

    /// See [`DesktopNotifier::send_notification`]
    pub fn send_notification(
        &self,
        notification: Notification,
    ) -> Result<DispatchedNotification, DispatchError> {
        self.runtime
            .block_on(self.notifier.send_notification(notification))
    }

    /// See [`DesktopNotifier::send`]
    pub fn send(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<DispatchedNotification, DispatchError> {
        self.runtime.block_on(self.notifier.send(title, message))
    }

    /// See [`DesktopNotifier::replace`]
    pub fn replace(
        &self,
        previous: &DispatchedNotification,
        notification: Notification,
    ) -> Result<DispatchedNotification, DispatchError> {
        self.runtime
            .block_on(self.notifier.replace(previous, notification))
    }

    /// See [`DesktopNotifier::current_notifications`]
    pub fn current_notifications(&self) -> Vec<String> {
        self.runtime.block_on(self.notifier.current_notifications())
    }

    /// See [`DesktopNotifier::clear`]
    pub fn clear(&self, identifier: &str) -> Result<(), DispatchError> {
        self.runtime.block_on(self.notifier.clear(identifier))
    }

    /// See [`DesktopNotifier::clear_all`]
    pub fn clear_all(&self) -> Result<(), DispatchError> {
        self.runtime.block_on(self.notifier.clear_all())
    }

    /// See [`DesktopNotifier::capabilities`]
    pub fn capabilities(&self) -> Result<Capabilities, DispatchError> {
        self.runtime.block_on(self.notifier.capabilities())
    }

    /// Block the calling thread for `duration`, e.g. to wait for interactions in
    /// a short-lived program.
    pub fn wait(&self, duration: Duration) {
        self.runtime.block_on(tokio::time::sleep(duration));
    }
}
