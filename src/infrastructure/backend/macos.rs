//! macOS notification center adapter
//!
//! Each notification is shown by mac-notification-sys on a blocking task that waits
//! for the user's response, which is then reported as a backend event. The bundle
//! identifier is registered once per process through notify-rust. Delivered
//! notifications cannot be withdrawn.

use std::time::Duration;

use async_trait::async_trait;
use mac_notification_sys::{MainButton, NotificationResponse};
use tracing::{debug, warn};

use crate::application::ports::{
    BackendError, BackendEvent, BackendEventKind, CloseReason, EventSink, NotificationBackend,
    SendRequest,
};
use crate::domain::{Capabilities, Capability, Notification, Sound};

/// Sound name mac-notification-sys maps to the system default sound
const SYSTEM_DEFAULT_SOUND: &str = "Default";

/// Title of the drop-down holding more than one button
const ACTIONS_TITLE: &str = "Actions";

const CLOSE_TITLE: &str = "Close";

/// Delivery errors surface within this window; after it the response is awaited
/// in the background.
const DELIVERY_GRACE: Duration = Duration::from_millis(250);

/// Owned copy of what the notification center shows
struct Delivery {
    title: String,
    message: String,
    app_icon: Option<String>,
    content_image: Option<String>,
    sound: Option<String>,
    buttons: Vec<String>,
    reply_placeholder: Option<String>,
}

impl Delivery {
    fn new(request: &SendRequest<'_>) -> Self {
        let notification = request.notification;

        let app_icon = request.icon().and_then(|icon| match icon.as_path() {
            Some(path) => Some(path.to_string_lossy().into_owned()),
            None => {
                debug!(%icon, "Named icons are not supported on macOS");
                None
            }
        });

        Self {
            title: notification.title().to_owned(),
            message: notification.message().to_owned(),
            app_icon,
            content_image: notification
                .attachment()
                .map(|attachment| attachment.as_path().to_string_lossy().into_owned()),
            sound: notification.sound().and_then(sound_name),
            buttons: notification
                .buttons()
                .iter()
                .map(|button| button.title().to_owned())
                .collect(),
            reply_placeholder: notification
                .reply_field()
                .map(|field| field.title().to_owned()),
        }
    }

    /// Show the notification and block until the user responds
    fn show(&self) -> Result<NotificationResponse, String> {
        let buttons: Vec<&str> = self.buttons.iter().map(String::as_str).collect();

        let mut native = mac_notification_sys::Notification::new();
        native
            .title(&self.title)
            .message(&self.message)
            .wait_for_click(true);

        if let Some(placeholder) = &self.reply_placeholder {
            if !buttons.is_empty() {
                debug!("Buttons are hidden by the reply field on macOS");
            }
            native.main_button(MainButton::Response(placeholder));
        } else if let [single] = buttons.as_slice() {
            native.main_button(MainButton::SingleAction(*single));
        } else if !buttons.is_empty() {
            native.main_button(MainButton::DropdownActions(ACTIONS_TITLE, &buttons));
        }
        if self.reply_placeholder.is_some() || !buttons.is_empty() {
            native.close_button(CLOSE_TITLE);
        }

        if let Some(icon) = &self.app_icon {
            native.app_icon(icon);
        }
        if let Some(image) = &self.content_image {
            native.content_image(image);
        }
        if let Some(sound) = &self.sound {
            native.sound(sound.as_str());
        }

        native.send().map_err(|e| e.to_string())
    }
}

fn sound_name(sound: &Sound) -> Option<String> {
    if sound.is_default_sound() {
        return Some(SYSTEM_DEFAULT_SOUND.to_string());
    }
    match sound.as_name() {
        Some(name) => Some(name.to_string()),
        None => {
            warn!(%sound, "Sound files are not supported on macOS, sending silently");
            None
        }
    }
}

/// Translate the notification center's response. Buttons are reported by title.
fn response_event(notification: &Notification, response: NotificationResponse) -> BackendEventKind {
    match response {
        NotificationResponse::Click => BackendEventKind::Clicked,
        NotificationResponse::ActionButton(title) => {
            let identifier = notification
                .button_by_title(&title)
                .map(|button| button.identifier().to_string())
                .unwrap_or(title);
            BackendEventKind::ButtonPressed(identifier)
        }
        NotificationResponse::Reply(text) => BackendEventKind::Replied(text),
        NotificationResponse::CloseButton(_) => BackendEventKind::Dismissed,
        NotificationResponse::None => BackendEventKind::Closed(CloseReason::Undefined),
    }
}

fn emit(
    sink: &EventSink,
    identifier: String,
    notification: &Notification,
    response: NotificationResponse,
) {
    let kind = response_event(notification, response);
    if sink.send(BackendEvent::new(identifier, kind)).is_err() {
        debug!("Event receiver dropped, response discarded");
    }
}

/// macOS notification center backend
pub struct MacosBackend {
    sink: EventSink,
}

impl MacosBackend {
    pub fn new(app_name: &str, sink: EventSink) -> Self {
        let bundle = notify_rust::get_bundle_identifier_or_default(app_name);
        if let Err(e) = notify_rust::set_application(&bundle) {
            debug!(%bundle, error = %e, "Application already registered");
        }
        Self { sink }
    }
}

#[async_trait]
impl NotificationBackend for MacosBackend {
    fn name(&self) -> &'static str {
        "macos"
    }

    async fn request_authorisation(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    async fn has_authorisation(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    async fn send(&self, request: SendRequest<'_>) -> Result<(), BackendError> {
        let delivery = Delivery::new(&request);
        let notification = request.notification.clone();
        let identifier = request.identifier.to_string();

        // The native call blocks until the user responds
        let mut shown = tokio::task::spawn_blocking(move || delivery.show());

        match tokio::time::timeout(DELIVERY_GRACE, &mut shown).await {
            Ok(joined) => {
                let response = joined
                    .map_err(|e| BackendError::SendFailed(format!("Task join error: {}", e)))?
                    .map_err(BackendError::SendFailed)?;
                emit(&self.sink, identifier, &notification, response);
            }
            Err(_) => {
                debug!(identifier = %identifier, "Notification delivered, awaiting response");
                let sink = self.sink.clone();
                tokio::spawn(async move {
                    match shown.await {
                        Ok(Ok(response)) => emit(&sink, identifier, &notification, response),
                        Ok(Err(e)) => {
                            warn!(identifier = %identifier, error = %e, "Notification failed");
                            let failed = BackendEventKind::Closed(CloseReason::Failed);
                            let _ = sink.send(BackendEvent::new(identifier, failed));
                        }
                        Err(e) => warn!(identifier = %identifier, error = %e, "Response task failed"),
                    }
                });
            }
        }
        Ok(())
    }

    async fn clear(&self, identifier: &str) -> Result<(), BackendError> {
        debug!(identifier, "Delivered notifications cannot be withdrawn on macOS");
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), BackendError> {
        debug!("Delivered notifications cannot be withdrawn on macOS");
        Ok(())
    }

    async fn capabilities(&self) -> Result<Capabilities, BackendError> {
        Ok(Capabilities::from([
            Capability::Title,
            Capability::Message,
            Capability::Icon,
            Capability::IconFile,
            Capability::Buttons,
            Capability::ReplyField,
            Capability::Attachment,
            Capability::Sound,
            Capability::SoundName,
            Capability::OnDispatched,
            Capability::OnClicked,
            Capability::OnDismissed,
        ]))
    }
}
