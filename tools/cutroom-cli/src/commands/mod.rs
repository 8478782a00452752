pub mod edit;
pub mod export;
pub mod info;
pub mod init;
pub mod overlay;
pub mod stats;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use cutroom_common::config::AppConfig;
use cutroom_common::error::{CutroomError, CutroomResult};
use cutroom_edit_model::LoadedProject;
use cutroom_render_client::{HttpRenderEngine, OfflineEngine, RenderEngine};

pub(crate) fn load_project(path: &Path) -> CutroomResult<LoadedProject> {
    let project_file = path.join("meta").join("project.json");
    if !project_file.exists() {
        return Err(CutroomError::FileNotFound { path: project_file });
    }
    LoadedProject::load(path).map_err(|e| CutroomError::project(format!("failed to load: {e}")))
}

pub(crate) fn save_project(project: &mut LoadedProject) -> CutroomResult<()> {
    project
        .save()
        .map_err(|e| CutroomError::project(format!("failed to save: {e}")))
}

pub(crate) fn render_engine(
    config: &AppConfig,
    offline: bool,
) -> CutroomResult<Arc<dyn RenderEngine>> {
    if offline {
        return Ok(Arc::new(OfflineEngine));
    }
    Ok(Arc::new(HttpRenderEngine::from_config(&config.engine)?))
}
