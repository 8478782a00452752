//! Degraded mode: simulated progress for jobs the engine never accepted.
//!
//! Always terminates. After `steps` ticks the job is completed with a
//! `simulated://` output locator.

use cutroom_common::config::DegradedModeConfig;
use tracing::{debug, info};

use crate::job::{Job, JobId, JobStatus};
use crate::registry::JobRegistry;

pub(crate) fn simulated_locator(job: &Job) -> String {
    format!(
        "simulated://export_{}.{}",
        job.id,
        job.settings.format.extension()
    )
}

pub(crate) async fn run(registry: &JobRegistry, config: &DegradedModeConfig, id: &JobId, attempt: u32) {
    let steps = config.steps();
    debug!(job = %id, steps, "Starting simulated export");

    for step in 1..=steps {
        tokio::time::sleep(config.tick()).await;

        let running = registry.update(id, |job| {
            if job.attempts != attempt || job.status != JobStatus::Processing {
                return false;
            }
            if step == steps {
                let locator = simulated_locator(job);
                job.complete(Some(locator));
                false
            } else {
                job.advance_simulation(f64::from(step) * 100.0 / f64::from(steps));
                true
            }
        });

        match running {
            Some(true) => {}
            Some(false) => {
                info!(job = %id, "Simulated export ended");
                return;
            }
            None => {
                debug!(job = %id, "Job removed, stopping simulation");
                return;
            }
        }
    }
}
