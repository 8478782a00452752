//! Show the render engine's job counts.

use cutroom_common::config::AppConfig;

use super::render_engine;

pub async fn run(config: &AppConfig, offline: bool) -> anyhow::Result<()> {
    let engine = render_engine(config, offline)?;
    let stats = engine.stats().await?;

    println!("Render engine at {}:", config.engine.base_url);
    println!("  Pending:    {}", stats.pending);
    println!("  Processing: {}", stats.processing);
    println!("  Completed:  {}", stats.completed);
    println!("  Failed:     {}", stats.failed);
    println!("  Total:      {}", stats.total);
    Ok(())
}
