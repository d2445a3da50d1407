//! Notification request model
//!
//! A [`Notification`] is built once with the `with_*` / `on_*` methods and never
//! mutated afterwards. Some fields are ignored or interpreted differently by some
//! platforms, see [`Capability`](crate::domain::Capability).
//!
//! Per-notification callbacks only fire while the [`DesktopNotifier`] that sent the
//! notification is alive. Install app-level handlers on the notifier to respond to
//! interactions with notifications it does not know about.
//!
//! [`DesktopNotifier`]: crate::application::DesktopNotifier

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::error::UrgencyParseError;
use crate::domain::resource::{Attachment, Icon, Sound};

/// Callback without arguments
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Callback receiving the reply text
pub type ReplyCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Generate a fresh notification or button identifier
pub fn new_identifier() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Notification urgency. Interpretation and visuals depend on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Urgency {
    /// Low priority notification
    Low,
    /// Default platform notification level
    #[default]
    Normal,
    /// For critical errors; may break through silencing
    Critical,
}

impl Urgency {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = UrgencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "critical" => Ok(Self::Critical),
            _ => Err(UrgencyParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// A button on an interactive notification
#[derive(Clone)]
pub struct Button {
    title: String,
    identifier: String,
    on_pressed: Option<Callback>,
}

impl Button {
    /// Create a button with a random identifier
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            identifier: new_identifier(),
            on_pressed: None,
        }
    }

    /// Use a caller-chosen identifier, e.g. to recognise the button in an
    /// app-level handler after a restart.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn on_pressed(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_pressed = Some(Arc::new(callback));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn pressed_handler(&self) -> Option<Callback> {
        self.on_pressed.clone()
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("title", &self.title)
            .field("identifier", &self.identifier)
            .field("on_pressed", &self.on_pressed.is_some())
            .finish()
    }
}

/// A text field on an interactive notification
#[derive(Clone)]
pub struct ReplyField {
    title: String,
    button_title: String,
    on_replied: Option<ReplyCallback>,
}

impl ReplyField {
    pub fn new() -> Self {
        Self {
            title: "Reply".to_string(),
            button_title: "Send".to_string(),
            on_replied: None,
        }
    }

    /// Title of the field. On macOS this is the button that reveals the field.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Title of the button that sends the reply
    pub fn with_button_title(mut self, button_title: impl Into<String>) -> Self {
        self.button_title = button_title.into();
        self
    }

    pub fn on_replied(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_replied = Some(Arc::new(callback));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn button_title(&self) -> &str {
        &self.button_title
    }

    pub(crate) fn replied_handler(&self) -> Option<ReplyCallback> {
        self.on_replied.clone()
    }
}

impl Default for ReplyField {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReplyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyField")
            .field("title", &self.title)
            .field("button_title", &self.button_title)
            .field("on_replied", &self.on_replied.is_some())
            .finish()
    }
}

/// Per-notification interaction callbacks
#[derive(Clone, Default)]
pub(crate) struct NotificationHandlers {
    pub on_dispatched: Option<Callback>,
    pub on_cleared: Option<Callback>,
    pub on_clicked: Option<Callback>,
    pub on_dismissed: Option<Callback>,
}

/// A desktop notification
#[derive(Clone)]
pub struct Notification {
    title: String,
    message: String,
    urgency: Urgency,
    icon: Option<Icon>,
    buttons: Vec<Button>,
    reply_field: Option<ReplyField>,
    attachment: Option<Attachment>,
    sound: Option<Sound>,
    thread: Option<String>,
    timeout: Option<Duration>,
    identifier: String,
    handlers: NotificationHandlers,
}

impl Notification {
    /// Create a notification with a random identifier and default settings
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            urgency: Urgency::default(),
            icon: None,
            buttons: Vec::new(),
            reply_field: None,
            attachment: None,
            sound: None,
            thread: None,
            timeout: None,
            identifier: new_identifier(),
            handlers: NotificationHandlers::default(),
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<Icon>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn with_buttons(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        self.buttons.extend(buttons);
        self
    }

    pub fn with_reply_field(mut self, reply_field: ReplyField) -> Self {
        self.reply_field = Some(reply_field);
        self
    }

    pub fn with_attachment(mut self, attachment: impl Into<Attachment>) -> Self {
        self.attachment = Some(attachment.into());
        self
    }

    pub fn with_sound(mut self, sound: impl Into<Sound>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Group related notifications together, e.g. by chat room
    pub fn with_thread(mut self, thread: impl Into<String>) -> Self {
        self.thread = Some(thread.into());
        self
    }

    /// Withdraw the notification after `timeout`. Zero means platform default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Called once the notification was handed to the notification server
    pub fn on_dispatched(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.handlers.on_dispatched = Some(Arc::new(callback));
        self
    }

    /// Called when the notification is cleared without user interaction
    pub fn on_cleared(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.handlers.on_cleared = Some(Arc::new(callback));
        self
    }

    pub fn on_clicked(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.handlers.on_clicked = Some(Arc::new(callback));
        self
    }

    pub fn on_dismissed(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.handlers.on_dismissed = Some(Arc::new(callback));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn icon(&self) -> Option<&Icon> {
        self.icon.as_ref()
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Look up a button by its identifier
    pub fn button(&self, identifier: &str) -> Option<&Button> {
        self.buttons.iter().find(|b| b.identifier == identifier)
    }

    /// Look up a button by its title. Used by platforms that report titles.
    pub fn button_by_title(&self, title: &str) -> Option<&Button> {
        self.buttons.iter().find(|b| b.title == title)
    }

    pub fn reply_field(&self) -> Option<&ReplyField> {
        self.reply_field.as_ref()
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn sound(&self) -> Option<&Sound> {
        self.sound.as_ref()
    }

    pub fn thread(&self) -> Option<&str> {
        self.thread.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn handlers(&self) -> &NotificationHandlers {
        &self.handlers
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("identifier", &self.identifier)
            .field("title", &self.title)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A notification as it was handed to the platform.
///
/// `identifier` is the identifier used on the platform. It equals the request's own
/// identifier unless that one was already in use by a displayed notification.
#[derive(Clone, Debug)]
pub struct DispatchedNotification {
    identifier: String,
    notification: Notification,
}

impl DispatchedNotification {
    pub fn new(identifier: impl Into<String>, notification: Notification) -> Self {
        Self {
            identifier: identifier.into(),
            notification,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }
}
