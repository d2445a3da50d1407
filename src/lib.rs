//! desktop-dispatch - cross-platform desktop notifications
//!
//! Send notifications with buttons, reply fields, sounds and attachments through
//! the native notification service of the running platform, and receive the
//! user's interactions as callbacks.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Notification request model, resources, capabilities, configuration
//! - **Application**: The [`DesktopNotifier`] facade, dispatch registry and port interfaces
//! - **Infrastructure**: Platform backends (D-Bus, macOS, WinRT toasts) and the config store
//!
//! # Example
//!
//! ```no_run
//! use desktop_dispatch::{Button, DesktopNotifier, Notification, Urgency};
//!
//! # async fn run() -> Result<(), desktop_dispatch::DispatchError> {
//! let notifier = DesktopNotifier::new("Mail")?;
//!
//! let notification = Notification::new("New message", "Lunch at noon?")
//!     .with_urgency(Urgency::Critical)
//!     .with_button(Button::new("Mark as read").on_pressed(|| println!("read")))
//!     .on_clicked(|| println!("clicked"));
//!
//! notifier.send_notification(notification).await?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::ports::{
    BackendError, BackendEvent, BackendEventKind, CloseReason, EventSink, NotificationBackend,
    SendRequest,
};
pub use application::{BlockingNotifier, DesktopNotifier, DesktopNotifierBuilder, DispatchError};
pub use domain::{
    Attachment, BackendKind, Button, Capabilities, Capability, DispatchedNotification,
    FileResource, Icon, Notification, NotifierConfig, ReplyField, Resource, Sound, Timeout,
    Urgency,
};
pub use infrastructure::{load_merged_config, XdgConfigStore};
