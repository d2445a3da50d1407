//! Application layer - Facade, registry and port interfaces
//!
//! Contains the dispatch bookkeeping and the trait definitions
//! for notification services and configuration storage.

pub mod blocking;
pub mod notifier;
pub mod ports;
pub mod registry;

// Re-export the facade
pub use blocking::BlockingNotifier;
pub use notifier::{
    DesktopNotifier, DesktopNotifierBuilder, DispatchError, IdCallback, IdTextCallback,
};
pub use registry::DispatchRegistry;
