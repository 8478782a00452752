//! HTTP transport for the render engine's JSON API.
//!
//! | call    | route                        |
//! |---------|------------------------------|
//! | submit  | `POST /api/export`           |
//! | status  | `GET  /api/job/{id}`         |
//! | cancel  | `POST /api/job/{id}/cancel`  |
//! | stats   | `GET  /api/jobs/stats`       |
//! | still   | `POST /api/video/{id}/thumbnail` |

use std::time::Duration;

use async_trait::async_trait;
use cutroom_common::config::EngineConfig;
use cutroom_edit_model::AssetId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{EngineError, EngineJobId, EngineStats, EngineStatus, RenderEngine};
use crate::request::RenderPayload;

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    job_id: String,
}

#[derive(Debug, Serialize)]
struct ThumbnailRequest {
    time: f64,
}

#[derive(Debug, Deserialize)]
struct ThumbnailResponse {
    url: String,
}

/// Render engine reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRenderEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRenderEngine {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Protocol(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Ask the engine for a still frame of an ingested asset.
    ///
    /// Returns the still's locator. The engine answers 404 for assets it
    /// never ingested.
    pub async fn thumbnail(&self, asset: &AssetId, offset_secs: f64) -> Result<String, EngineError> {
        let url = self.url(&format!("/api/video/{asset}/thumbnail"));
        let body = ThumbnailRequest { time: offset_secs };
        let response = self.send(self.client.post(url).json(&body)).await?;
        let still: ThumbnailResponse = Self::decode(response).await?;
        Ok(still.url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, EngineError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
        Err(EngineError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, EngineError> {
        response
            .json::<T>()
            .await
            .map_err(|e| EngineError::Protocol(e.to_string()))
    }
}

/// Join a base URL and an absolute path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn transport_error(err: reqwest::Error) -> EngineError {
    if err.is_decode() {
        EngineError::Protocol(err.to_string())
    } else {
        EngineError::Unreachable(err.to_string())
    }
}

/// A 404 on a per-job route means the engine has forgotten the job.
fn job_not_found(job: &EngineJobId) -> impl FnOnce(EngineError) -> EngineError + '_ {
    move |err| match err {
        EngineError::Rejected { status: 404, .. } => EngineError::UnknownJob(job.clone()),
        other => other,
    }
}

#[async_trait]
impl RenderEngine for HttpRenderEngine {
    fn name(&self) -> &str {
        "http"
    }

    async fn submit(&self, payload: &RenderPayload) -> Result<EngineJobId, EngineError> {
        debug!(
            url = %self.base_url,
            clips = payload.clips.len(),
            settings = %payload.settings,
            "Submitting export"
        );
        let response = self
            .send(self.client.post(self.url("/api/export")).json(payload))
            .await?;
        let body: SubmitResponse = Self::decode(response).await?;
        Ok(EngineJobId(body.job_id))
    }

    async fn status(&self, job: &EngineJobId) -> Result<EngineStatus, EngineError> {
        let url = self.url(&format!("/api/job/{job}"));
        let response = self
            .send(self.client.get(url))
            .await
            .map_err(job_not_found(job))?;
        Self::decode(response).await
    }

    async fn cancel(&self, job: &EngineJobId) -> Result<(), EngineError> {
        let url = self.url(&format!("/api/job/{job}/cancel"));
        self.send(self.client.post(url))
            .await
            .map_err(job_not_found(job))?;
        Ok(())
    }

    async fn stats(&self) -> Result<EngineStats, EngineError> {
        let response = self.send(self.client.get(self.url("/api/jobs/stats"))).await?;
        Self::decode(response).await
    }
}
