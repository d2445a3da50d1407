//! Notification backends
//!
//! One adapter per platform notification service, picked at compile time.

#[cfg(all(unix, not(target_os = "macos")))]
pub mod dbus;
mod dummy;
#[cfg(target_os = "macos")]
pub mod macos;
pub mod toast_xml;
#[cfg(windows)]
pub mod winrt;

#[cfg(all(unix, not(target_os = "macos")))]
pub use dbus::DbusBackend;
pub use dummy::DummyBackend;
#[cfg(target_os = "macos")]
pub use macos::MacosBackend;
#[cfg(windows)]
pub use winrt::WinrtBackend;

use tracing::debug;

use crate::application::ports::{BackendError, EventSink, NotificationBackend};
use crate::domain::BackendKind;

/// Create the backend for `kind` on the current platform
pub fn create_backend(
    kind: BackendKind,
    app_name: &str,
    sink: EventSink,
) -> Result<Box<dyn NotificationBackend>, BackendError> {
    let backend: Box<dyn NotificationBackend> = match kind {
        BackendKind::Dummy => Box::new(DummyBackend::new()),
        BackendKind::Auto => create_platform_backend(app_name, sink)?,
    };
    debug!(backend = backend.name(), app_name, "Notification backend selected");
    Ok(backend)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn create_platform_backend(
    app_name: &str,
    sink: EventSink,
) -> Result<Box<dyn NotificationBackend>, BackendError> {
    Ok(Box::new(DbusBackend::new(app_name, sink)))
}

#[cfg(target_os = "macos")]
fn create_platform_backend(
    app_name: &str,
    sink: EventSink,
) -> Result<Box<dyn NotificationBackend>, BackendError> {
    Ok(Box::new(MacosBackend::new(app_name, sink)))
}

#[cfg(windows)]
fn create_platform_backend(
    app_name: &str,
    sink: EventSink,
) -> Result<Box<dyn NotificationBackend>, BackendError> {
    Ok(Box::new(WinrtBackend::new(app_name, sink)?))
}

#[cfg(not(any(unix, windows)))]
fn create_platform_backend(
    _app_name: &str,
    _sink: EventSink,
) -> Result<Box<dyn NotificationBackend>, BackendError> {
    Ok(Box::new(DummyBackend::new()))
}
