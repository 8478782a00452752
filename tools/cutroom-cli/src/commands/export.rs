//! Export a project through the render engine.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use cutroom_common::config::AppConfig;
use cutroom_edit_model::ExportSettings;
use cutroom_job_orchestrator::{Job, JobOrchestrator, JobStatus};
use cutroom_render_client::{build_render_request, BaseUrlResolver};

use super::{load_project, render_engine};

const REFRESH: Duration = Duration::from_millis(500);

pub async fn run(
    path: PathBuf,
    presets: Vec<ExportSettings>,
    config: &AppConfig,
    offline: bool,
    json: bool,
) -> anyhow::Result<()> {
    println!("Exporting project at: {}", path.display());

    let project = load_project(&path)?;
    let graph = &project.project.graph;
    if graph.clips().is_empty() {
        anyhow::bail!("Nothing to export: the timeline has no clips");
    }
    let beyond = graph.trims_beyond_asset();
    if let Some((clip, duration)) = beyond.first() {
        anyhow::bail!(
            "{} clip(s) trim past their asset's duration (clip {} ends at {}s of {}s); \
             trim them before exporting",
            beyond.len(),
            clip.id,
            clip.source_end,
            duration
        );
    }

    let presets = if presets.is_empty() {
        vec![project.project.export]
    } else {
        presets
    };

    let resolver = BaseUrlResolver::new(config.engine.base_url.clone());
    let base = build_render_request(graph, presets[0], &resolver);
    if !base.unresolved_clips.is_empty() {
        println!(
            "  Warning: {} clip(s) have no durable locator; sending raw sources",
            base.unresolved_clips.len()
        );
    }
    let requests: Vec<_> = presets.iter().map(|s| base.with_settings(*s)).collect();

    let engine = render_engine(config, offline)?;
    let orchestrator =
        JobOrchestrator::new(engine, config.polling.clone(), config.degraded.clone());
    println!("  Engine: {} ({})", orchestrator.engine_name(), config.engine.base_url);

    let ids = orchestrator.batch_submit(requests).await;
    for (id, settings) in ids.iter().zip(&presets) {
        let (w, h) = settings.output_dimensions();
        println!("  Job {id}: {settings} ({w}x{h})");
    }

    let jobs = track(&orchestrator, &ids).await;

    println!();
    for job in &jobs {
        println!("Job {} [{}] {}", job.id, job.settings, job.status);
        for line in job.log_lines() {
            println!("  {line}");
        }
        if let Some(output) = &job.output_locator {
            println!("  Output: {output}");
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
    }

    let failed = jobs.iter().filter(|j| j.status == JobStatus::Failed).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} export(s) failed", jobs.len());
    }
    println!("\nAll {} export(s) complete.", jobs.len());
    Ok(())
}

/// Redraw a one-line progress summary until every job is terminal.
async fn track(orchestrator: &JobOrchestrator, ids: &[cutroom_job_orchestrator::JobId]) -> Vec<Job> {
    loop {
        let jobs: Vec<Job> = ids.iter().filter_map(|id| orchestrator.get(id)).collect();

        let summary: Vec<String> = jobs
            .iter()
            .map(|j| format!("{} {} {:.0}%", j.id, j.status, j.progress))
            .collect();
        print!("\r  {}  ", summary.join(" | "));
        let _ = std::io::stdout().flush();

        if jobs.iter().all(Job::is_terminal) {
            println!();
            return jobs;
        }
        tokio::time::sleep(REFRESH).await;
    }
}
