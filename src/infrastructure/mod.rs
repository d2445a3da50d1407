//! Infrastructure layer - Adapter implementations
//!
//! Platform notification backends and the configuration store.

pub mod backend;
pub mod config;

// Re-export adapters
pub use backend::{create_backend, DummyBackend};
pub use config::{load_merged_config, XdgConfigStore};
