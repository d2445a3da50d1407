//! Mapping between notifications and the freedesktop notification protocol
//!
//! Everything here is plain data so it can be tested without a session bus.

use std::collections::HashMap;

use crate::application::ports::{BackendEventKind, CloseReason};
use crate::domain::{Capabilities, Capability, Notification, Urgency};

/// Action key the server reports when the notification body is clicked
pub const DEFAULT_ACTION_KEY: &str = "default";

/// Action key announcing a KDE inline reply field
pub const INLINE_REPLY_ACTION_KEY: &str = "inline-reply";

/// Theme sound played for the default sound
pub const DEFAULT_SOUND_THEME_NAME: &str = "message-new-instant";

/// Expiry passed to `Notify`. Timeouts are handled by the notifier itself.
pub const EXPIRE_SERVER_DEFAULT: i32 = -1;

/// A hint value, before conversion to a D-Bus variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintValue {
    Byte(u8),
    Str(String),
}

/// Flattened `[key, label, key, label, ...]` action list
pub fn actions(notification: &Notification) -> Vec<String> {
    let mut actions = vec![DEFAULT_ACTION_KEY.to_string(), String::new()];

    for button in notification.buttons() {
        actions.push(button.identifier().to_string());
        actions.push(button.title().to_string());
    }

    if let Some(reply_field) = notification.reply_field() {
        actions.push(INLINE_REPLY_ACTION_KEY.to_string());
        actions.push(reply_field.button_title().to_string());
    }

    actions
}

/// Hints for `Notify`
pub fn hints(notification: &Notification) -> HashMap<&'static str, HintValue> {
    let mut hints = HashMap::new();

    hints.insert("urgency", HintValue::Byte(urgency_byte(notification.urgency())));

    if let Some(sound) = notification.sound() {
        if sound.is_default_sound() {
            hints.insert(
                "sound-name",
                HintValue::Str(DEFAULT_SOUND_THEME_NAME.to_string()),
            );
        } else if let Some(name) = sound.as_name() {
            hints.insert("sound-name", HintValue::Str(name.to_string()));
        } else if let Some(uri) = sound.as_uri() {
            hints.insert("sound-file", HintValue::Str(uri));
        }
    }

    if let Some(attachment) = notification.attachment() {
        hints.insert("image-path", HintValue::Str(attachment.as_uri()));
    }

    if let Some(reply_field) = notification.reply_field() {
        hints.insert(
            "x-kde-reply-placeholder-text",
            HintValue::Str(reply_field.title().to_string()),
        );
    }

    hints
}

pub fn urgency_byte(urgency: Urgency) -> u8 {
    match urgency {
        Urgency::Low => 0,
        Urgency::Normal => 1,
        Urgency::Critical => 2,
    }
}

/// Event for an `ActionInvoked` signal
pub fn action_event(action_key: &str) -> BackendEventKind {
    if action_key == DEFAULT_ACTION_KEY {
        BackendEventKind::Clicked
    } else {
        BackendEventKind::ButtonPressed(action_key.to_string())
    }
}

/// Event for a `NotificationClosed` signal
pub fn closed_event(reason: u32) -> BackendEventKind {
    match reason {
        1 => BackendEventKind::Closed(CloseReason::Expired),
        2 => BackendEventKind::Dismissed,
        3 => BackendEventKind::Closed(CloseReason::Closed),
        _ => BackendEventKind::Closed(CloseReason::Undefined),
    }
}

/// Capabilities given what the server reports from `GetCapabilities`
pub fn capabilities<S: AsRef<str>>(server_capabilities: &[S]) -> Capabilities {
    let has = |name: &str| server_capabilities.iter().any(|cap| cap.as_ref() == name);

    let mut capabilities = Capabilities::from([
        Capability::AppName,
        Capability::Title,
        Capability::Urgency,
        Capability::Icon,
        Capability::IconFile,
        Capability::IconName,
        Capability::Timeout,
        Capability::OnDispatched,
        Capability::OnCleared,
        Capability::OnDismissed,
    ]);

    if has("body") {
        capabilities = capabilities.with(Capability::Message);
    }
    if has("actions") {
        capabilities = capabilities
            .with(Capability::Buttons)
            .with(Capability::OnClicked);
    }
    if has("sound") {
        capabilities = capabilities
            .with(Capability::Sound)
            .with(Capability::SoundName)
            .with(Capability::SoundFile);
    }
    if has("inline-reply") {
        capabilities = capabilities.with(Capability::ReplyField);
    }
    if has("body-images") {
        capabilities = capabilities.with(Capability::Attachment);
    }

    capabilities
}

/// Bidirectional map between server-assigned ids and notification identifiers
#[derive(Debug, Default)]
pub struct PlatformIds {
    by_native: HashMap<u32, String>,
    by_identifier: HashMap<String, u32>,
}

impl PlatformIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a server id with an identifier, dropping stale associations of both
    pub fn insert(&mut self, native: u32, identifier: impl Into<String>) {
        let identifier = identifier.into();
        if let Some(old_identifier) = self.by_native.remove(&native) {
            self.by_identifier.remove(&old_identifier);
        }
        if let Some(old_native) = self.by_identifier.remove(&identifier) {
            self.by_native.remove(&old_native);
        }
        self.by_native.insert(native, identifier.clone());
        self.by_identifier.insert(identifier, native);
    }

    pub fn native(&self, identifier: &str) -> Option<u32> {
        self.by_identifier.get(identifier).copied()
    }

    pub fn pop_native(&mut self, native: u32) -> Option<String> {
        let identifier = self.by_native.remove(&native)?;
        self.by_identifier.remove(&identifier);
        Some(identifier)
    }

    pub fn pop_identifier(&mut self, identifier: &str) -> Option<u32> {
        let native = self.by_identifier.remove(identifier)?;
        self.by_native.remove(&native);
        Some(native)
    }

    pub fn identifiers(&self) -> Vec<String> {
        self.by_identifier.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_native.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_native.is_empty()
    }
}
