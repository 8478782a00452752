//! Job records and their state transitions.

use std::fmt;

use chrono::{DateTime, Utc};
use cutroom_common::clock;
use cutroom_edit_model::ExportSettings;
use cutroom_render_client::{EngineJobId, EngineJobState, EngineStatus, RenderRequest};
use serde::{Deserialize, Serialize};

/// Client-side job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// A fresh 12-hex-digit id.
    pub fn new() -> Self {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(12);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Position in job listings: active jobs first.
    pub(crate) fn listing_rank(self) -> u8 {
        match self {
            Self::Processing => 0,
            Self::Pending => 1,
            Self::Completed => 2,
            Self::Failed => 3,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Who produced a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOrigin {
    /// Written by the orchestrator.
    Local,
    /// Copied from the render engine, which stamps its own lines.
    Engine,
}

/// One line of a job's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobLogEntry {
    /// Time the line was appended.
    pub at: DateTime<Utc>,
    pub message: String,
    pub origin: LogOrigin,
}

impl fmt::Display for JobLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            LogOrigin::Local => write!(f, "[{}] {}", clock::log_timestamp(&self.at), self.message),
            LogOrigin::Engine => f.write_str(&self.message),
        }
    }
}

/// How a job is being driven to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobMode {
    /// Tracked through the render engine's status API.
    Engine,
    /// Engine unreachable at submission; progress is simulated locally.
    Degraded,
}

/// A tracked export.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// 0 to 100, never decreases within one attempt.
    pub progress: f64,
    pub logs: Vec<JobLogEntry>,
    pub created_at: DateTime<Utc>,
    /// Set when the job reaches a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
    pub output_locator: Option<String>,
    /// Settings at submission time. Later edits never reach this job.
    pub settings: ExportSettings,
    pub engine_job_id: Option<EngineJobId>,
    pub mode: JobMode,
    /// Submission attempts, starting at 1. Retry increments it.
    pub attempts: u32,

    #[serde(skip)]
    request: RenderRequest,
    #[serde(skip)]
    engine_logs_consumed: usize,
    /// Attempt whose poll loop is running, if any.
    #[serde(skip)]
    polled_attempt: Option<u32>,
}

impl Job {
    pub(crate) fn new(request: RenderRequest) -> Self {
        let settings = request.settings();
        let mut job = Self {
            id: JobId::new(),
            status: JobStatus::Pending,
            progress: 0.0,
            logs: vec![],
            created_at: clock::now(),
            completed_at: None,
            output_locator: None,
            settings,
            engine_job_id: None,
            mode: JobMode::Engine,
            attempts: 1,
            request,
            engine_logs_consumed: 0,
            polled_attempt: None,
        };
        let clips = job.request.payload.clips.len();
        job.log(format!("Export queued: {clips} clip(s) at {settings}"));
        job
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The render request snapshot this job submits.
    pub fn request(&self) -> &RenderRequest {
        &self.request
    }

    /// Number of engine log lines already copied into `logs`.
    pub fn engine_logs_consumed(&self) -> usize {
        self.engine_logs_consumed
    }

    /// Log lines formatted for display.
    pub fn log_lines(&self) -> Vec<String> {
        self.logs.iter().map(ToString::to_string).collect()
    }

    pub(crate) fn log(&mut self, message: impl Into<String>) {
        self.logs.push(JobLogEntry {
            at: clock::now(),
            message: message.into(),
            origin: LogOrigin::Local,
        });
    }

    fn set_progress(&mut self, progress: f64) {
        if progress.is_finite() {
            self.progress = self.progress.max(progress.clamp(0.0, 100.0));
        }
    }

    /// pending → processing, tracked by the engine.
    pub(crate) fn accept(&mut self, engine_job: EngineJobId) {
        self.log(format!("Submitted to render engine as job {engine_job}"));
        self.engine_job_id = Some(engine_job);
        self.mode = JobMode::Engine;
        self.status = JobStatus::Processing;
    }

    /// pending → processing, simulated locally.
    pub(crate) fn enter_degraded(&mut self, reason: &str) {
        self.log(format!(
            "Render engine unreachable ({reason}); simulating export locally"
        ));
        self.mode = JobMode::Degraded;
        self.status = JobStatus::Processing;
    }

    pub(crate) fn advance_simulation(&mut self, progress: f64) {
        self.set_progress(progress);
    }

    pub(crate) fn complete(&mut self, output_locator: Option<String>) {
        self.progress = 100.0;
        self.status = JobStatus::Completed;
        self.completed_at = Some(clock::now());
        match &output_locator {
            Some(locator) => self.log(format!("Export completed: {locator}")),
            None => self.log("Export completed"),
        }
        self.output_locator = output_locator;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.log(message);
        self.status = JobStatus::Failed;
        self.completed_at = Some(clock::now());
    }

    /// Fold one status snapshot into the job.
    ///
    /// Engine log lines past the watermark are appended once. Progress only
    /// moves forward.
    pub(crate) fn apply_engine_status(&mut self, status: EngineStatus) {
        if status.logs.len() > self.engine_logs_consumed {
            let now = clock::now();
            for line in &status.logs[self.engine_logs_consumed..] {
                self.logs.push(JobLogEntry {
                    at: now,
                    message: line.clone(),
                    origin: LogOrigin::Engine,
                });
            }
            self.engine_logs_consumed = status.logs.len();
        }
        self.set_progress(status.progress);

        match status.status {
            EngineJobState::Pending | EngineJobState::Processing => {}
            EngineJobState::Completed => self.complete(status.output_locator),
            EngineJobState::Failed => self.fail("Render engine reported the export as failed"),
        }
    }

    /// Claim the poll loop for the current attempt. `None` when the job is
    /// not engine-tracked and processing, or a loop already owns the attempt.
    pub(crate) fn claim_poller(&mut self) -> Option<(u32, EngineJobId)> {
        if self.status != JobStatus::Processing
            || self.mode != JobMode::Engine
            || self.polled_attempt == Some(self.attempts)
        {
            return None;
        }
        let engine_job = self.engine_job_id.clone()?;
        self.polled_attempt = Some(self.attempts);
        Some((self.attempts, engine_job))
    }

    /// failed → pending for a new attempt. Log history is kept.
    pub(crate) fn reset_for_retry(&mut self) {
        self.attempts += 1;
        self.progress = 0.0;
        self.engine_job_id = None;
        self.engine_logs_consumed = 0;
        self.completed_at = None;
        self.output_locator = None;
        self.mode = JobMode::Engine;
        self.status = JobStatus::Pending;
        self.log(format!("Retrying export (attempt {})", self.attempts));
    }
}
