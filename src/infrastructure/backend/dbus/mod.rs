//! `org.freedesktop.Notifications` adapter over the session bus
//!
//! The connection is opened on first use. Server signals are translated on a
//! background task that lives as long as the connection.

pub mod protocol;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use zbus::zvariant::Value;
use zbus::{proxy, Connection};

use crate::application::ports::{
    BackendError, BackendEvent, BackendEventKind, EventSink, NotificationBackend, SendRequest,
};
use crate::domain::Capabilities;

use protocol::{HintValue, PlatformIds};

#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications",
    gen_blocking = false
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: &HashMap<&str, &Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;

    fn close_notification(&self, id: u32) -> zbus::Result<()>;

    fn get_capabilities(&self) -> zbus::Result<Vec<String>>;

    fn get_server_information(&self) -> zbus::Result<(String, String, String, String)>;

    #[zbus(signal)]
    fn action_invoked(&self, id: u32, action_key: String) -> zbus::Result<()>;

    #[zbus(signal)]
    fn notification_closed(&self, id: u32, reason: u32) -> zbus::Result<()>;

    #[zbus(signal)]
    fn notification_replied(&self, id: u32, text: String) -> zbus::Result<()>;
}

/// Server signal reduced to owned data
enum Signal {
    Action { id: u32, key: String },
    Closed { id: u32, reason: u32 },
    Replied { id: u32, text: String },
}

impl Signal {
    fn into_parts(self) -> (u32, BackendEventKind) {
        match self {
            Self::Action { id, key } => (id, protocol::action_event(&key)),
            Self::Closed { id, reason } => (id, protocol::closed_event(reason)),
            Self::Replied { id, text } => (id, BackendEventKind::Replied(text)),
        }
    }
}

/// Backend for freedesktop notification servers
pub struct DbusBackend {
    app_name: String,
    sink: EventSink,
    ids: Arc<Mutex<PlatformIds>>,
    proxy: OnceCell<NotificationsProxy<'static>>,
}

impl DbusBackend {
    pub fn new(app_name: impl Into<String>, sink: EventSink) -> Self {
        Self {
            app_name: app_name.into(),
            sink,
            ids: Arc::new(Mutex::new(PlatformIds::new())),
            proxy: OnceCell::new(),
        }
    }

    async fn proxy(&self) -> Result<&NotificationsProxy<'static>, BackendError> {
        self.proxy
            .get_or_try_init(|| async {
                let connection = Connection::session()
                    .await
                    .map_err(|e| BackendError::Unavailable(e.to_string()))?;
                let proxy = NotificationsProxy::new(&connection)
                    .await
                    .map_err(|e| BackendError::Unavailable(e.to_string()))?;

                if let Ok((name, vendor, version, spec_version)) =
                    proxy.get_server_information().await
                {
                    debug!(%name, %vendor, %version, %spec_version, "Connected to notification server");
                }

                self.listen(&proxy).await?;
                Ok(proxy)
            })
            .await
    }

    /// Subscribe to server signals and forward the ones for our notifications
    async fn listen(&self, proxy: &NotificationsProxy<'static>) -> Result<(), BackendError> {
        let subscribe = |e: zbus::Error| BackendError::Unavailable(e.to_string());

        let actions = proxy
            .receive_action_invoked()
            .await
            .map_err(subscribe)?
            .filter_map(|signal| async move {
                let args = signal.args().ok()?;
                Some(Signal::Action {
                    id: *args.id(),
                    key: args.action_key().clone(),
                })
            });
        let closed = proxy
            .receive_notification_closed()
            .await
            .map_err(subscribe)?
            .filter_map(|signal| async move {
                let args = signal.args().ok()?;
                Some(Signal::Closed {
                    id: *args.id(),
                    reason: *args.reason(),
                })
            });
        let replied = proxy
            .receive_notification_replied()
            .await
            .map_err(subscribe)?
            .filter_map(|signal| async move {
                let args = signal.args().ok()?;
                Some(Signal::Replied {
                    id: *args.id(),
                    text: args.text().clone(),
                })
            });

        let streams: Vec<BoxStream<'static, Signal>> =
            vec![actions.boxed(), closed.boxed(), replied.boxed()];
        let mut signals = stream::select_all(streams);

        let ids = Arc::clone(&self.ids);
        let sink = self.sink.clone();

        tokio::spawn(async move {
            while let Some(signal) = signals.next().await {
                let (native, kind) = signal.into_parts();

                // Every signal ends the notification's life on the server, and ids
                // unknown here belong to other applications.
                let Some(identifier) = ids.lock().pop_native(native) else {
                    continue;
                };

                if sink.send(BackendEvent::new(identifier, kind)).is_err() {
                    debug!("Event receiver dropped, stopping signal listener");
                    break;
                }
            }
        });

        Ok(())
    }
}

#[async_trait]
impl NotificationBackend for DbusBackend {
    fn name(&self) -> &'static str {
        "dbus"
    }

    async fn request_authorisation(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    async fn has_authorisation(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    async fn send(&self, request: SendRequest<'_>) -> Result<(), BackendError> {
        let proxy = self.proxy().await?;
        let notification = request.notification;

        let replaces_id = request
            .replaces
            .and_then(|identifier| self.ids.lock().native(identifier))
            .unwrap_or(0);

        let icon = request
            .icon()
            .map(|icon| icon.as_name_or_uri())
            .unwrap_or_default();

        let actions = protocol::actions(notification);
        let actions: Vec<&str> = actions.iter().map(String::as_str).collect();

        let hints: HashMap<&str, Value<'_>> = protocol::hints(notification)
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    HintValue::Byte(byte) => Value::from(byte),
                    HintValue::Str(text) => Value::from(text),
                };
                (key, value)
            })
            .collect();
        let hints: HashMap<&str, &Value<'_>> =
            hints.iter().map(|(key, value)| (*key, value)).collect();

        let native = proxy
            .notify(
                &self.app_name,
                replaces_id,
                &icon,
                notification.title(),
                notification.message(),
                &actions,
                &hints,
                protocol::EXPIRE_SERVER_DEFAULT,
            )
            .await
            .map_err(|e| BackendError::SendFailed(e.to_string()))?;

        self.ids.lock().insert(native, request.identifier);
        debug!(identifier = request.identifier, native, "Notification sent over D-Bus");
        Ok(())
    }

    async fn clear(&self, identifier: &str) -> Result<(), BackendError> {
        let native = self.ids.lock().pop_identifier(identifier);
        let Some(native) = native else {
            debug!(identifier, "No server id for notification, nothing to close");
            return Ok(());
        };

        let proxy = self.proxy().await?;
        if let Err(e) = proxy.close_notification(native).await {
            debug!(identifier, error = %e, "Notification already closed");
        }
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), BackendError> {
        let identifiers = self.ids.lock().identifiers();
        for identifier in identifiers {
            self.clear(&identifier).await?;
        }
        Ok(())
    }

    async fn capabilities(&self) -> Result<Capabilities, BackendError> {
        let proxy = self.proxy().await?;
        match proxy.get_capabilities().await {
            Ok(server_capabilities) => Ok(protocol::capabilities(server_capabilities.as_slice())),
            Err(e) => {
                warn!(error = %e, "GetCapabilities failed, assuming a minimal server");
                Ok(protocol::capabilities::<String>(&[]))
            }
        }
    }
}
