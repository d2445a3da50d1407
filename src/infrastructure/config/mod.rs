//! Configuration adapters and layered loading

mod xdg;

pub use xdg::{XdgConfigStore, CONFIG_DIR_NAME};

use std::env;

use tracing::warn;

use crate::application::ports::ConfigStore;
use crate::domain::config::NotifierConfig;

/// Environment variable overriding the app name
pub const APP_NAME_ENV: &str = "DESKTOP_DISPATCH_APP_NAME";

/// Environment variable overriding the backend kind
pub const BACKEND_ENV: &str = "DESKTOP_DISPATCH_BACKEND";

/// Config built from environment overrides, looked up through `lookup`
pub fn env_config(lookup: impl Fn(&str) -> Option<String>) -> NotifierConfig {
    let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
    NotifierConfig {
        app_name: var(APP_NAME_ENV),
        backend: var(BACKEND_ENV),
        ..Default::default()
    }
}

/// Load the effective configuration.
///
/// Merge order: defaults < file < environment. An unreadable or invalid file is
/// logged and skipped.
pub async fn load_merged_config(store: &dyn ConfigStore) -> NotifierConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %store.path().display(), error = %e, "Ignoring config file");
            NotifierConfig::empty()
        }
    };

    NotifierConfig::defaults()
        .merge(file_config)
        .merge(env_config(|key| env::var(key).ok()))
}
