//! Validate a Cutroom project before export.

use std::path::PathBuf;

use super::load_project;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating project at: {}", path.display());

    let project = load_project(&path)?;
    let p = &project.project;

    println!("  Name: {}", p.name);
    println!("  Version: {}", p.version);
    println!("  Assets: {}", p.graph.assets().len());
    println!("  Clips: {}", p.graph.clips().len());
    println!("  Audio tracks: {}", p.graph.audio_tracks().len());

    let errors = p.validate();
    if errors.is_empty() {
        println!("\nProject is valid.");
    } else {
        println!("\nValidation issues:");
        for error in &errors {
            println!("  - {error}");
        }
        println!(
            "\n{} issue(s) found. The render engine may reject this export.",
            errors.len()
        );
    }

    Ok(())
}
