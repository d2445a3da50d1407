//! Notification backend port interface
//!
//! A backend performs the native call to schedule, replace or clear a notification
//! and translates native interaction events into [`BackendEvent`]s. Events are pushed
//! onto the [`EventSink`] handed to the backend when it is created; the facade owns
//! the receiving end and routes events to callbacks.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::{Capabilities, Icon, Notification};

/// Backend errors
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Notification service unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to show notification: {0}")]
    SendFailed(String),

    #[error("Failed to clear notification: {0}")]
    ClearFailed(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// Why a notification was closed without user interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The notification server let it expire
    Expired,
    /// Closed by a call to the server
    Closed,
    /// The platform failed to show it
    Failed,
    Undefined,
}

/// What happened to a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEventKind {
    Clicked,
    Dismissed,
    /// Button identifier
    ButtonPressed(String),
    /// Reply text
    Replied(String),
    Closed(CloseReason),
}

/// A native interaction event, already correlated to the notification identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEvent {
    pub identifier: String,
    pub kind: BackendEventKind,
}

impl BackendEvent {
    pub fn new(identifier: impl Into<String>, kind: BackendEventKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
        }
    }
}

/// Sending half of the backend event channel
pub type EventSink = mpsc::UnboundedSender<BackendEvent>;

/// Receiving half of the backend event channel
pub type EventStream = mpsc::UnboundedReceiver<BackendEvent>;

/// Create a connected sink/stream pair
pub fn event_channel() -> (EventSink, EventStream) {
    mpsc::unbounded_channel()
}

/// Everything a backend needs to schedule one notification
#[derive(Debug, Clone, Copy)]
pub struct SendRequest<'a> {
    /// Identifier to use on the platform
    pub identifier: &'a str,
    pub notification: &'a Notification,
    /// Identifier of a displayed notification to replace
    pub replaces: Option<&'a str>,
    /// App-wide icon, used when the notification has none
    pub app_icon: Option<&'a Icon>,
}

impl<'a> SendRequest<'a> {
    pub fn new(identifier: &'a str, notification: &'a Notification) -> Self {
        Self {
            identifier,
            notification,
            replaces: None,
            app_icon: None,
        }
    }

    /// The notification's icon, else the app icon
    pub fn icon(&self) -> Option<&'a Icon> {
        self.notification.icon().or(self.app_icon)
    }
}

/// Port for a platform notification service
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Request authorisation to send notifications.
    /// May show a system prompt the first time.
    ///
    /// # Returns
    /// Whether authorisation has been granted
    async fn request_authorisation(&self) -> Result<bool, BackendError>;

    /// Whether notifications are currently permitted
    async fn has_authorisation(&self) -> Result<bool, BackendError>;

    /// Schedule a notification.
    ///
    /// Must fail when nothing could be delivered. Problems that still allow a
    /// degraded notification (unreadable attachment, unknown sound) are logged.
    async fn send(&self, request: SendRequest<'_>) -> Result<(), BackendError>;

    /// Remove a notification. Already-closed notifications are not an error.
    async fn clear(&self, identifier: &str) -> Result<(), BackendError>;

    /// Remove all notifications of this app
    async fn clear_all(&self) -> Result<(), BackendError>;

    /// Functionality supported by the platform and, where it matters, the server
    async fn capabilities(&self) -> Result<Capabilities, BackendError>;

    /// Identifiers the platform reports as displayed.
    ///
    /// # Returns
    /// `None` if the platform cannot tell
    async fn delivered(&self) -> Result<Option<Vec<String>>, BackendError> {
        Ok(None)
    }
}

/// Blanket implementation for boxed backend types
#[async_trait]
impl NotificationBackend for Box<dyn NotificationBackend> {
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    async fn request_authorisation(&self) -> Result<bool, BackendError> {
        self.as_ref().request_authorisation().await
    }

    async fn has_authorisation(&self) -> Result<bool, BackendError> {
        self.as_ref().has_authorisation().await
    }

    async fn send(&self, request: SendRequest<'_>) -> Result<(), BackendError> {
        self.as_ref().send(request).await
    }

    async fn clear(&self, identifier: &str) -> Result<(), BackendError> {
        self.as_ref().clear(identifier).await
    }

    async fn clear_all(&self) -> Result<(), BackendError> {
        self.as_ref().clear_all().await
    }

    async fn capabilities(&self) -> Result<Capabilities, BackendError> {
        self.as_ref().capabilities().await
    }

    async fn delivered(&self) -> Result<Option<Vec<String>>, BackendError> {
        self.as_ref().delivered().await
    }
}
