//! Windows toast adapter over the WinRT notification APIs

use async_trait::async_trait;
use tracing::{debug, warn};
use windows::core::{IInspectable, Interface, HSTRING};
use windows::Data::Xml::Dom::XmlDocument;
use windows::Foundation::{IPropertyValue, TypedEventHandler};
use windows::UI::Notifications::{
    NotificationSetting, ToastActivatedEventArgs, ToastDismissalReason, ToastDismissedEventArgs,
    ToastFailedEventArgs, ToastNotification, ToastNotificationManager, ToastNotificationPriority,
    ToastNotifier,
};
use winreg::enums::HKEY_CURRENT_USER;
use winreg::RegKey;

use crate::application::ports::{
    BackendError, BackendEvent, BackendEventKind, CloseReason, EventSink, NotificationBackend,
    SendRequest,
};
use crate::domain::{Capabilities, Capability};

use super::toast_xml::{self, Activation};

/// Toast group shared by all notifications of this process
const TOAST_GROUP: &str = "desktop-dispatch";

fn platform(e: windows::core::Error) -> BackendError {
    BackendError::Platform(e.message().to_string())
}

/// Register the app user model id so toasts show the app's display name
fn register_app_id(app_id: &str) -> std::io::Result<()> {
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let (key, _) = hkcu.create_subkey(format!("SOFTWARE\\Classes\\AppUserModelId\\{}", app_id))?;
    key.set_value("DisplayName", &app_id.to_string())?;
    Ok(())
}

/// Windows toast backend
pub struct WinrtBackend {
    app_id: HSTRING,
    notifier: ToastNotifier,
    sink: EventSink,
}

impl WinrtBackend {
    pub fn new(app_name: &str, sink: EventSink) -> Result<Self, BackendError> {
        if let Err(e) = register_app_id(app_name) {
            warn!(app_id = app_name, error = %e, "Failed to register app user model id");
        }

        let app_id = HSTRING::from(app_name);
        let notifier =
            ToastNotificationManager::CreateToastNotifierWithId(&app_id).map_err(platform)?;

        Ok(Self {
            app_id,
            notifier,
            sink,
        })
    }

    fn activation_event(
        identifier: &str,
        args: &IInspectable,
    ) -> windows::core::Result<Option<BackendEventKind>> {
        let args: ToastActivatedEventArgs = args.cast()?;
        let arguments = args.Arguments()?.to_string_lossy();

        let kind = match toast_xml::parse_activation(&arguments) {
            Activation::Clicked => BackendEventKind::Clicked,
            Activation::Button(button) => BackendEventKind::ButtonPressed(button),
            Activation::Reply => {
                let text: IPropertyValue = args
                    .UserInput()?
                    .Lookup(&HSTRING::from(toast_xml::REPLY_INPUT_ID))?
                    .cast()?;
                BackendEventKind::Replied(text.GetString()?.to_string_lossy())
            }
            Activation::Unknown(arguments) => {
                debug!(identifier, %arguments, "Ignoring unknown toast activation");
                return Ok(None);
            }
        };
        Ok(Some(kind))
    }

    fn subscribe(&self, toast: &ToastNotification, identifier: &str) -> Result<(), BackendError> {
        let sink = self.sink.clone();
        let id = identifier.to_string();
        toast
            .Activated(&TypedEventHandler::new(
                move |_: &Option<ToastNotification>, args: &Option<IInspectable>| {
                    let Some(args) = args else {
                        return Ok(());
                    };
                    match Self::activation_event(&id, args) {
                        Ok(Some(kind)) => {
                            let _ = sink.send(BackendEvent::new(id.clone(), kind));
                        }
                        Ok(None) => {}
                        Err(e) => warn!(identifier = %id, error = %e, "Unreadable toast activation"),
                    }
                    Ok(())
                },
            ))
            .map_err(platform)?;

        let sink = self.sink.clone();
        let id = identifier.to_string();
        toast
            .Dismissed(&TypedEventHandler::new(
                move |_: &Option<ToastNotification>, args: &Option<ToastDismissedEventArgs>| {
                    if let Some(args) = args {
                        if args.Reason()? == ToastDismissalReason::UserCanceled {
                            let _ = sink.send(BackendEvent::new(id.clone(), BackendEventKind::Dismissed));
                        }
                    }
                    Ok(())
                },
            ))
            .map_err(platform)?;

        let sink = self.sink.clone();
        let id = identifier.to_string();
        toast
            .Failed(&TypedEventHandler::new(
                move |_: &Option<ToastNotification>, args: &Option<ToastFailedEventArgs>| {
                    if let Some(args) = args {
                        warn!(identifier = %id, code = ?args.ErrorCode()?, "Toast failed");
                    }
                    let _ = sink.send(BackendEvent::new(
                        id.clone(),
                        BackendEventKind::Closed(CloseReason::Failed),
                    ));
                    Ok(())
                },
            ))
            .map_err(platform)?;

        Ok(())
    }
}

#[async_trait]
impl NotificationBackend for WinrtBackend {
    fn name(&self) -> &'static str {
        "winrt"
    }

    async fn request_authorisation(&self) -> Result<bool, BackendError> {
        self.has_authorisation().await
    }

    async fn has_authorisation(&self) -> Result<bool, BackendError> {
        match self.notifier.Setting() {
            Ok(setting) => Ok(setting == NotificationSetting::Enabled),
            Err(e) => {
                debug!(error = %e, "Cannot read toast setting, assuming enabled");
                Ok(true)
            }
        }
    }

    async fn send(&self, request: SendRequest<'_>) -> Result<(), BackendError> {
        let xml = toast_xml::render(&request);

        let document = XmlDocument::new().map_err(platform)?;
        document
            .LoadXml(&HSTRING::from(xml))
            .map_err(|e| BackendError::SendFailed(e.message().to_string()))?;

        let toast = ToastNotification::CreateToastNotification(&document).map_err(platform)?;
        toast
            .SetTag(&HSTRING::from(request.identifier))
            .map_err(platform)?;
        toast
            .SetGroup(&HSTRING::from(TOAST_GROUP))
            .map_err(platform)?;
        let priority = if toast_xml::is_high_priority(request.notification) {
            ToastNotificationPriority::High
        } else {
            ToastNotificationPriority::Default
        };
        toast.SetPriority(priority).map_err(platform)?;

        self.subscribe(&toast, request.identifier)?;

        self.notifier
            .Show(&toast)
            .map_err(|e| BackendError::SendFailed(e.message().to_string()))?;
        debug!(identifier = request.identifier, "Toast shown");
        Ok(())
    }

    async fn clear(&self, identifier: &str) -> Result<(), BackendError> {
        let history = ToastNotificationManager::History().map_err(platform)?;
        if let Err(e) = history.RemoveGroupedTagWithId(
            &HSTRING::from(identifier),
            &HSTRING::from(TOAST_GROUP),
            &self.app_id,
        ) {
            debug!(identifier, error = %e, "Toast already removed");
        }
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), BackendError> {
        ToastNotificationManager::History()
            .and_then(|history| history.ClearWithId(&self.app_id))
            .map_err(|e| BackendError::ClearFailed(e.message().to_string()))
    }

    async fn capabilities(&self) -> Result<Capabilities, BackendError> {
        Ok(Capabilities::from([
            Capability::Title,
            Capability::Message,
            Capability::Icon,
            Capability::IconFile,
            Capability::Buttons,
            Capability::ReplyField,
            Capability::OnDispatched,
            Capability::OnCleared,
            Capability::OnClicked,
            Capability::OnDismissed,
            Capability::Thread,
            Capability::Attachment,
            Capability::Sound,
            Capability::SoundName,
            Capability::SoundFile,
            Capability::Urgency,
            Capability::Timeout,
        ]))
    }
}
