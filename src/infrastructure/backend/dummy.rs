//! Backend that accepts every notification and shows none

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{BackendError, NotificationBackend, SendRequest};
use crate::domain::Capabilities;

/// No-op backend for unsupported platforms and headless use
#[derive(Debug, Default)]
pub struct DummyBackend;

impl DummyBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "dummy"
    }

    async fn request_authorisation(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    async fn has_authorisation(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    async fn send(&self, request: SendRequest<'_>) -> Result<(), BackendError> {
        debug!(identifier = request.identifier, "Dropping notification");
        Ok(())
    }

    async fn clear(&self, _identifier: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn capabilities(&self) -> Result<Capabilities, BackendError> {
        Ok(Capabilities::empty())
    }
}
