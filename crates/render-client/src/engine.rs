//! Render engine abstraction.
//!
//! The engine executes render payloads out of process. The orchestrator only
//! ever sees it through [`RenderEngine`], so the HTTP client, the offline
//! stand-in, and test doubles are interchangeable.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::request::RenderPayload;

/// Job identifier assigned by the render engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineJobId(pub String);

impl EngineJobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EngineJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineJobState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl EngineJobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Snapshot returned by a status query.
///
/// `logs` is cumulative: every query returns the full log so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub status: EngineJobState,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(rename = "output_url", default)]
    pub output_locator: Option<String>,
}

/// Per-state job counts kept by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
}

/// Render engine errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// No answer: connection refused, timeout, DNS failure.
    #[error("render engine unreachable: {0}")]
    Unreachable(String),

    /// The engine answered and refused the call.
    #[error("render engine rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("render engine has no job {0}")]
    UnknownJob(EngineJobId),

    /// The engine answered with something we could not decode.
    #[error("render engine protocol error: {0}")]
    Protocol(String),
}

impl From<EngineError> for cutroom_common::CutroomError {
    fn from(err: EngineError) -> Self {
        cutroom_common::CutroomError::engine(err.to_string())
    }
}

/// A service that renders payloads and reports on the resulting jobs.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Hand a payload to the engine. Returns the engine's job id.
    async fn submit(&self, payload: &RenderPayload) -> Result<EngineJobId, EngineError>;

    async fn status(&self, job: &EngineJobId) -> Result<EngineStatus, EngineError>;

    async fn cancel(&self, job: &EngineJobId) -> Result<(), EngineError>;

    async fn stats(&self) -> Result<EngineStats, EngineError>;
}
