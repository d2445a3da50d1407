//! Notifier configuration value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::resource::Icon;
use crate::domain::timeout::Timeout;

/// Default application name shown by the notification server
pub const DEFAULT_APP_NAME: &str = "desktop-dispatch";

/// Which backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// The native backend of the running platform
    #[default]
    Auto,
    /// Accept and drop every notification
    Dummy,
}

impl BackendKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Dummy => "dummy",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "dummy" | "none" => Ok(Self::Dummy),
            _ => Err(ConfigError::ValidationError {
                key: "backend".to_string(),
                message: format!("unknown backend '{}'. Valid options: auto, dummy", s),
            }),
        }
    }
}

/// Notifier configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub app_name: Option<String>,
    pub app_icon: Option<String>,
    pub notification_limit: Option<usize>,
    pub default_timeout: Option<String>,
    pub backend: Option<String>,
}

impl NotifierConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            app_name: Some(DEFAULT_APP_NAME.to_string()),
            app_icon: None,
            notification_limit: None,
            default_timeout: None,
            backend: Some(BackendKind::Auto.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            app_name: other.app_name.or(self.app_name),
            app_icon: other.app_icon.or(self.app_icon),
            notification_limit: other.notification_limit.or(self.notification_limit),
            default_timeout: other.default_timeout.or(self.default_timeout),
            backend: other.backend.or(self.backend),
        }
    }

    /// Check every set value, reporting the first invalid one
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.app_name {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    key: "app_name".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if let Some(icon) = &self.app_icon {
            icon.parse::<Icon>()
                .map_err(|e| ConfigError::ValidationError {
                    key: "app_icon".to_string(),
                    message: e.to_string(),
                })?;
        }
        if self.notification_limit == Some(0) {
            return Err(ConfigError::ValidationError {
                key: "notification_limit".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(timeout) = &self.default_timeout {
            timeout
                .parse::<Timeout>()
                .map_err(|e| ConfigError::ValidationError {
                    key: "default_timeout".to_string(),
                    message: e.to_string(),
                })?;
        }
        if let Some(backend) = &self.backend {
            backend.parse::<BackendKind>()?;
        }
        Ok(())
    }

    /// Get app name, or the crate default if not set
    pub fn app_name_or_default(&self) -> &str {
        self.app_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_APP_NAME)
    }

    /// Get app icon as parsed Icon, or None if not set/invalid
    pub fn app_icon_or_default(&self) -> Option<Icon> {
        self.app_icon.as_ref().and_then(|s| s.parse().ok())
    }

    /// Get notification limit, ignoring a zero limit
    pub fn notification_limit_or_default(&self) -> Option<usize> {
        self.notification_limit.filter(|&limit| limit > 0)
    }

    /// Get default timeout as parsed Timeout, or None if not set/invalid
    pub fn default_timeout_or_default(&self) -> Option<Timeout> {
        self.default_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
    }

    /// Get backend kind, or Auto if not set/invalid
    pub fn backend_or_default(&self) -> BackendKind {
        self.backend
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}
