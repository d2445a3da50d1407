//! Configuration value objects

mod notifier_config;

pub use notifier_config::{BackendKind, NotifierConfig, DEFAULT_APP_NAME};
