//! The job orchestrator.
//!
//! Every submission attempt runs as one spawned task: deliver the payload,
//! then either poll the engine or simulate progress. Tasks hold no lock and
//! no reference to their job between wakes; they look the job up on every
//! wake and stop as soon as it is gone, terminal, or superseded by a retry.

use std::sync::Arc;

use cutroom_common::clock::PollSchedule;
use cutroom_common::config::{DegradedModeConfig, PollingConfig};
use cutroom_render_client::{EngineError, EngineJobId, EngineStats, RenderEngine, RenderRequest};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::degraded;
use crate::job::{Job, JobId, JobStatus};
use crate::registry::JobRegistry;

/// Point-in-time job counts, derived from the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
}

struct Inner {
    engine: Arc<dyn RenderEngine>,
    registry: JobRegistry,
    polling: PollingConfig,
    degraded: DegradedModeConfig,
}

/// Submits render requests and tracks the resulting jobs.
///
/// Cheap to clone; clones share one registry. All operations that start
/// background work must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct JobOrchestrator {
    inner: Arc<Inner>,
}

/// What the delivery step decided.
enum Delivery {
    Poll,
    Simulate,
    Abandon(EngineJobId),
    Done,
}

impl JobOrchestrator {
    pub fn new(
        engine: Arc<dyn RenderEngine>,
        polling: PollingConfig,
        degraded: DegradedModeConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine,
                registry: JobRegistry::new(),
                polling,
                degraded,
            }),
        }
    }

    pub fn engine_name(&self) -> &str {
        self.inner.engine.name()
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Register a pending job for `request` and start delivering it.
    pub async fn submit(&self, request: RenderRequest) -> JobId {
        let job = Job::new(request);
        info!(job = %job.id, settings = %job.settings, "Export submitted");
        let id = self.inner.registry.insert(job);
        self.spawn_attempt(id.clone(), 1);
        id
    }

    /// Submit each request as an independent job.
    pub async fn batch_submit(&self, requests: Vec<RenderRequest>) -> Vec<JobId> {
        let mut ids = Vec::with_capacity(requests.len());
        for request in requests {
            ids.push(self.submit(request).await);
        }
        ids
    }

    /// Cancel a pending job. Returns false, changing nothing, in any other
    /// state.
    pub async fn cancel(&self, id: &JobId) -> bool {
        let outcome = self.inner.registry.update(id, |job| {
            if job.status != JobStatus::Pending {
                return None;
            }
            let engine_job = job.engine_job_id.clone();
            job.fail("Job cancelled by user");
            Some(engine_job)
        });

        match outcome {
            Some(Some(engine_job)) => {
                info!(job = %id, "Job cancelled");
                if let Some(engine_job) = engine_job {
                    self.cancel_on_engine(engine_job);
                }
                true
            }
            _ => {
                debug!(job = %id, "Cancel ignored, job not pending");
                false
            }
        }
    }

    /// Resubmit a failed job under the same id and settings. Returns false,
    /// changing nothing, in any other state.
    pub async fn retry(&self, id: &JobId) -> bool {
        let attempt = self.inner.registry.update(id, |job| {
            if job.status != JobStatus::Failed {
                return None;
            }
            job.reset_for_retry();
            Some(job.attempts)
        });

        match attempt.flatten() {
            Some(attempt) => {
                info!(job = %id, attempt, "Retrying export");
                self.spawn_attempt(id.clone(), attempt);
                true
            }
            None => false,
        }
    }

    /// Poll the engine until the job is terminal, removed, or superseded.
    ///
    /// Runs automatically after a successful submission. Returns immediately
    /// when the job is not engine-tracked and processing, or when another loop
    /// already polls its current attempt.
    pub async fn poll(&self, id: &JobId) {
        let tracked = self.inner.registry.update(id, Job::claim_poller);
        let Some(Some((attempt, engine_job))) = tracked else {
            debug!(job = %id, "Poll not started, job untracked or already polled");
            return;
        };

        let mut schedule = PollSchedule::from_config(&self.inner.polling);
        let backoff_secs = self.inner.polling.backoff().as_secs_f64();

        loop {
            tokio::time::sleep(schedule.next_delay()).await;

            let live = self
                .inner
                .registry
                .inspect(id, |job| job.attempts == attempt && job.status == JobStatus::Processing);
            match live {
                None => {
                    debug!(job = %id, "Job removed, stopping poll");
                    return;
                }
                Some(false) => return,
                Some(true) => {}
            }

            let result = self.inner.engine.status(&engine_job).await;

            let keep_polling = self.inner.registry.update(id, |job| {
                if job.attempts != attempt || job.status != JobStatus::Processing {
                    return false;
                }
                match result {
                    Ok(status) => {
                        if schedule.record_success() {
                            job.log("Reconnected to render engine");
                        }
                        job.apply_engine_status(status);
                        !job.is_terminal()
                    }
                    Err(EngineError::UnknownJob(engine_job)) => {
                        job.fail(format!("Render engine no longer knows job {engine_job}"));
                        false
                    }
                    Err(err) => {
                        if schedule.record_failure() {
                            warn!(job = %id, error = %err, "Status query failed");
                            job.log(format!(
                                "Lost contact with render engine ({err}); retrying every {backoff_secs}s"
                            ));
                        }
                        true
                    }
                }
            });

            match keep_polling {
                Some(true) => {}
                Some(false) => {
                    debug!(job = %id, "Poll loop finished");
                    return;
                }
                None => {
                    debug!(job = %id, "Job removed, stopping poll");
                    return;
                }
            }
        }
    }

    fn spawn_attempt(&self, id: JobId, attempt: u32) {
        let this = self.clone();
        tokio::spawn(async move { this.run_attempt(id, attempt).await });
    }

    async fn run_attempt(&self, id: JobId, attempt: u32) {
        match self.deliver(&id, attempt).await {
            Delivery::Poll => self.poll(&id).await,
            Delivery::Simulate => {
                degraded::run(&self.inner.registry, &self.inner.degraded, &id, attempt).await
            }
            Delivery::Abandon(engine_job) => self.cancel_on_engine(engine_job),
            Delivery::Done => {}
        }
    }

    async fn deliver(&self, id: &JobId, attempt: u32) -> Delivery {
        let payload = self.inner.registry.inspect(id, |job| {
            (job.attempts == attempt && job.status == JobStatus::Pending)
                .then(|| job.request().payload.clone())
        });
        let Some(Some(payload)) = payload else {
            return Delivery::Done;
        };

        let result = self.inner.engine.submit(&payload).await;

        let delivery = self.inner.registry.update(id, |job| {
            let current = job.attempts == attempt && job.status == JobStatus::Pending;
            match result {
                Ok(engine_job) if current => {
                    job.accept(engine_job);
                    Delivery::Poll
                }
                // Cancelled or superseded while the submit call was in flight.
                Ok(engine_job) => Delivery::Abandon(engine_job),
                Err(_) if !current => Delivery::Done,
                Err(EngineError::Unreachable(reason)) => {
                    job.enter_degraded(&reason);
                    Delivery::Simulate
                }
                Err(err) => {
                    job.fail(format!("Render engine rejected export: {err}"));
                    Delivery::Done
                }
            }
        });

        match delivery {
            Some(Delivery::Poll) => info!(job = %id, "Export accepted by render engine"),
            Some(Delivery::Simulate) => warn!(job = %id, "Render engine unreachable, using degraded mode"),
            Some(Delivery::Done) => debug!(job = %id, "Delivery ended without tracking"),
            Some(Delivery::Abandon(_)) => debug!(job = %id, "Engine accepted a job no longer wanted"),
            None => debug!(job = %id, "Job removed during delivery"),
        }
        delivery.unwrap_or(Delivery::Done)
    }

    /// Best-effort engine-side cancel. Never awaited by the caller.
    fn cancel_on_engine(&self, engine_job: EngineJobId) {
        let engine = Arc::clone(&self.inner.engine);
        tokio::spawn(async move {
            if let Err(err) = engine.cancel(&engine_job).await {
                debug!(engine_job = %engine_job, error = %err, "Engine did not acknowledge cancel");
            }
        });
    }

    // ── Registry views ───────────────────────────────────────────────────

    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.inner.registry.get(id)
    }

    /// All jobs: processing, pending, completed, failed; oldest first within
    /// each group.
    pub fn list(&self) -> Vec<Job> {
        let mut jobs = self.inner.registry.snapshot();
        jobs.sort_by(|a, b| {
            a.status
                .listing_rank()
                .cmp(&b.status.listing_rank())
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        jobs
    }

    pub fn stats(&self) -> JobStats {
        let mut stats = JobStats::default();
        for job in self.inner.registry.snapshot() {
            match job.status {
                JobStatus::Pending => stats.pending += 1,
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
            }
            stats.total += 1;
        }
        stats
    }

    /// Stop showing a job. In-flight work for it stops on its next wake.
    pub fn remove(&self, id: &JobId) -> Option<Job> {
        self.inner.registry.remove(id)
    }

    /// Remove every completed or failed job. Returns how many were removed.
    pub fn clear_finished(&self) -> usize {
        self.inner.registry.remove_where(Job::is_terminal)
    }

    pub fn subscribe(&self, id: &JobId) -> Option<watch::Receiver<Job>> {
        self.inner.registry.subscribe(id)
    }

    /// Wait for a job to reach a terminal state. `None` if it is removed
    /// first.
    pub async fn wait(&self, id: &JobId) -> Option<Job> {
        let mut rx = self.subscribe(id)?;
        loop {
            {
                let job = rx.borrow_and_update();
                if job.is_terminal() {
                    return Some(job.clone());
                }
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    }

    /// The engine's own job counts. Display only.
    pub async fn engine_stats(&self) -> Result<EngineStats, EngineError> {
        self.inner.engine.stats().await
    }
}
