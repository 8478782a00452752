//! Test doubles and fixtures shared by the orchestrator integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cutroom_common::config::{DegradedModeConfig, PollingConfig};
use cutroom_edit_model::{
    AspectRatio, AssetId, EditGraph, ExportFormat, ExportSettings, IngestedMedia, MediaAsset,
    MediaOrigin, Quality,
};
use cutroom_job_orchestrator::JobOrchestrator;
use cutroom_render_client::{
    build_render_request, DurableLocatorResolver, EngineError, EngineJobId, EngineJobState,
    EngineStats, EngineStatus, RenderEngine, RenderPayload, RenderRequest,
};
use tokio::sync::Notify;
use tokio::time::Instant;

/// One scripted answer to a status query.
#[derive(Debug, Clone)]
pub enum Step {
    Status(EngineStatus),
    Fail(EngineError),
}

pub fn processing(progress: f64, logs: &[&str]) -> Step {
    Step::Status(EngineStatus {
        status: EngineJobState::Processing,
        progress,
        logs: logs.iter().map(|l| l.to_string()).collect(),
        output_locator: None,
    })
}

pub fn completed(logs: &[&str], output: &str) -> Step {
    Step::Status(EngineStatus {
        status: EngineJobState::Completed,
        progress: 100.0,
        logs: logs.iter().map(|l| l.to_string()).collect(),
        output_locator: Some(output.to_string()),
    })
}

pub fn failed(progress: f64, logs: &[&str]) -> Step {
    Step::Status(EngineStatus {
        status: EngineJobState::Failed,
        progress,
        logs: logs.iter().map(|l| l.to_string()).collect(),
        output_locator: None,
    })
}

pub fn unreachable() -> Step {
    Step::Fail(EngineError::Unreachable("connection refused".into()))
}

#[derive(Default)]
struct EngineJob {
    steps: VecDeque<Step>,
    last: Option<Step>,
}

/// A render engine that answers from a script.
///
/// Each accepted submission takes the next status script; each status query
/// pops the next step, repeating the last step once the script runs out.
#[derive(Default)]
pub struct ScriptedEngine {
    gate: Option<Arc<Notify>>,
    submit_errors: Mutex<VecDeque<EngineError>>,
    scripts: Mutex<VecDeque<Vec<Step>>>,
    jobs: Mutex<HashMap<EngineJobId, EngineJob>>,
    submits: AtomicUsize,
    status_calls: Mutex<Vec<Instant>>,
    cancels: Mutex<Vec<EngineJobId>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every submission until the returned gate is notified, once per
    /// submission.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Status script for the next accepted submission.
    pub fn with_job(self, steps: Vec<Step>) -> Self {
        self.script_job(steps);
        self
    }

    pub fn script_job(&self, steps: Vec<Step>) {
        self.scripts.lock().unwrap().push_back(steps);
    }

    /// Make the next submission fail with `err`.
    pub fn fail_next_submit(&self, err: EngineError) {
        self.submit_errors.lock().unwrap().push_back(err);
    }

    pub fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> Vec<Instant> {
        self.status_calls.lock().unwrap().clone()
    }

    pub fn cancels(&self) -> Vec<EngineJobId> {
        self.cancels.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn submit(&self, _payload: &RenderPayload) -> Result<EngineJobId, EngineError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let n = self.submits.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(err) = self.submit_errors.lock().unwrap().pop_front() {
            return Err(err);
        }
        let id = EngineJobId::new(format!("engine-{n}"));
        let steps = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        self.jobs.lock().unwrap().insert(
            id.clone(),
            EngineJob {
                steps: steps.into(),
                last: None,
            },
        );
        Ok(id)
    }

    async fn status(&self, job: &EngineJobId) -> Result<EngineStatus, EngineError> {
        self.status_calls.lock().unwrap().push(Instant::now());
        let mut jobs = self.jobs.lock().unwrap();
        let Some(entry) = jobs.get_mut(job) else {
            return Err(EngineError::UnknownJob(job.clone()));
        };
        let step = match entry.steps.pop_front() {
            Some(step) => {
                entry.last = Some(step.clone());
                step
            }
            None => entry
                .last
                .clone()
                .unwrap_or_else(|| processing(0.0, &[])),
        };
        match step {
            Step::Status(status) => Ok(status),
            Step::Fail(err) => Err(err),
        }
    }

    async fn cancel(&self, job: &EngineJobId) -> Result<(), EngineError> {
        self.cancels.lock().unwrap().push(job.clone());
        Ok(())
    }

    async fn stats(&self) -> Result<EngineStats, EngineError> {
        let total = self.jobs.lock().unwrap().len();
        Ok(EngineStats {
            processing: total,
            total,
            ..EngineStats::default()
        })
    }
}

pub fn polling() -> PollingConfig {
    PollingConfig {
        interval_ms: 1000,
        backoff_ms: 2000,
    }
}

pub fn degraded() -> DegradedModeConfig {
    DegradedModeConfig {
        tick_ms: 300,
        step_percent: 10.0,
    }
}

pub fn orchestrator(engine: Arc<dyn RenderEngine>) -> JobOrchestrator {
    JobOrchestrator::new(engine, polling(), degraded())
}

fn asset(id: &str) -> MediaAsset {
    MediaAsset::from_ingested(
        format!("{id}.mp4"),
        format!("/tmp/{id}.mp4"),
        MediaOrigin::Local,
        IngestedMedia {
            asset_id: AssetId::new(id),
            durable_locator: Some(format!("/static/uploads/{id}.mp4")),
            duration_secs: 30.0,
            thumbnail: None,
        },
    )
}

/// A two-clip edit graph.
pub fn two_clip_graph() -> EditGraph {
    let mut graph = EditGraph::new();
    let a = graph.add_asset(asset("intro")).unwrap();
    let b = graph.add_asset(asset("main")).unwrap();
    graph.add_clip(&a, 0.0, 5.0).unwrap();
    graph.add_clip(&b, 2.0, 12.0).unwrap();
    graph
}

pub fn request(settings: ExportSettings) -> RenderRequest {
    build_render_request(&two_clip_graph(), settings, &DurableLocatorResolver)
}

pub fn default_request() -> RenderRequest {
    request(ExportSettings::default())
}

pub fn batch_settings() -> Vec<ExportSettings> {
    vec![
        ExportSettings::new(AspectRatio::Landscape, Quality::High, ExportFormat::Mp4),
        ExportSettings::new(AspectRatio::Portrait, Quality::Optimised, ExportFormat::Mov),
        ExportSettings::new(AspectRatio::Square, Quality::Low, ExportFormat::Avi),
    ]
}

/// Let spawned tasks run without moving virtual time meaningfully.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
