use async_trait::async_trait;

use crate::engine::{EngineError, EngineJobId, EngineStats, EngineStatus, RenderEngine};
use crate::request::RenderPayload;

/// An engine that is never there. Every export goes straight to degraded mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineEngine;

impl OfflineEngine {
    fn unreachable() -> EngineError {
        EngineError::Unreachable("offline mode".to_string())
    }
}

#[async_trait]
impl RenderEngine for OfflineEngine {
    fn name(&self) -> &str {
        "offline"
    }

    async fn submit(&self, _payload: &RenderPayload) -> Result<EngineJobId, EngineError> {
        Err(Self::unreachable())
    }

    async fn status(&self, _job: &EngineJobId) -> Result<EngineStatus, EngineError> {
        Err(Self::unreachable())
    }

    async fn cancel(&self, _job: &EngineJobId) -> Result<(), EngineError> {
        Err(Self::unreachable())
    }

    async fn stats(&self) -> Result<EngineStats, EngineError> {
        Err(Self::unreachable())
    }
}
