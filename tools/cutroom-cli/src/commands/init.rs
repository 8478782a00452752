//! Initialize a new Cutroom project.

use std::path::PathBuf;

use cutroom_edit_model::LoadedProject;

pub fn run(name: String, output: PathBuf) -> anyhow::Result<()> {
    let project_dir = output.join(&name);
    println!("Creating project '{}' at {}", name, project_dir.display());

    let project = LoadedProject::create(&project_dir, &name)
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    println!("Project created successfully:");
    println!("  Directory: {}", project.root.display());
    println!("  ID: {}", project.project.id);
    println!("  Default export: {}", project.project.export);
    println!();
    println!("Directory structure:");
    println!("  {}/", name);
    println!("  ├── meta/        (project.json)");
    println!("  └── exports/     (downloaded renders)");

    Ok(())
}
