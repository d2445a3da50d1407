//! Domain layer - Notification request model
//!
//! Contains value objects, the capability table, configuration and domain errors.
//! This layer has no dependencies on notification services.

pub mod capability;
pub mod config;
pub mod error;
pub mod notification;
pub mod resource;
pub mod timeout;

// Re-export common types
pub use capability::{Capabilities, Capability};
pub use config::{BackendKind, NotifierConfig};
pub use error::*;
pub use notification::{
    Button, Callback, DispatchedNotification, Notification, ReplyCallback, ReplyField, Urgency,
};
pub use resource::{Attachment, FileResource, Icon, Resource, Sound};
pub use timeout::Timeout;
