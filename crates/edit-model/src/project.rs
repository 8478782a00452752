//! Project metadata and on-disk layout.
//!
//! A project ties together the edit graph and the default export settings.
//! On disk it is a directory with `meta/project.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::graph::EditGraph;
use crate::settings::ExportSettings;

/// Current project file schema version.
pub const PROJECT_SCHEMA_VERSION: &str = "1.0";

/// Top-level project file (`project.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Unique project identifier (UUID).
    pub id: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// Assets, clips, and audio.
    #[serde(default)]
    pub graph: EditGraph,

    /// Settings used when an export does not specify its own.
    #[serde(default)]
    pub export: ExportSettings,
}

/// The complete in-memory representation of a loaded project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Filesystem path to the project directory.
    pub root: PathBuf,

    /// Project metadata and edit graph.
    pub project: Project,
}

impl Project {
    /// Create a new empty project.
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: PROJECT_SCHEMA_VERSION.to_string(),
            name: name.into(),
            id: Uuid::new_v4().to_string(),
            created_at: now.clone(),
            modified_at: now,
            graph: EditGraph::new(),
            export: ExportSettings::default(),
        }
    }

    /// Problems the render engine would hit with this project.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];

        for asset in self.graph.assets() {
            if asset.durable_locator.is_none() {
                errors.push(format!(
                    "Asset {} ({}) has no durable locator; export will send the raw source {}",
                    asset.id, asset.name, asset.source
                ));
            }
        }

        for clip in self.graph.clips() {
            if self.graph.asset(&clip.asset_id).is_none() {
                errors.push(format!(
                    "Clip {} references missing asset {}",
                    clip.id, clip.asset_id
                ));
            }
        }

        for (clip, duration) in self.graph.trims_beyond_asset() {
            errors.push(format!(
                "Clip {} trims to {}s but asset {} is only {}s long",
                clip.id, clip.source_end, clip.asset_id, duration
            ));
        }

        if self.graph.clips().is_empty() {
            errors.push("Timeline has no clips".to_string());
        }

        errors
    }
}

impl LoadedProject {
    fn project_path(root: &Path) -> PathBuf {
        root.join("meta").join("project.json")
    }

    /// Load a project from a directory.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();
        let project_path = Self::project_path(&root);

        let project_json =
            std::fs::read_to_string(&project_path).map_err(|e| ProjectError::IoError {
                path: project_path.clone(),
                source: e,
            })?;

        let project: Project =
            serde_json::from_str(&project_json).map_err(|e| ProjectError::ParseError {
                path: project_path,
                source: e,
            })?;

        if project.version != PROJECT_SCHEMA_VERSION {
            return Err(ProjectError::ValidationError {
                message: format!(
                    "unsupported project version {} (expected {PROJECT_SCHEMA_VERSION})",
                    project.version
                ),
            });
        }

        Ok(Self { root, project })
    }

    /// Save the project to disk, bumping the modified timestamp.
    pub fn save(&mut self) -> Result<(), ProjectError> {
        let meta_dir = self.root.join("meta");
        std::fs::create_dir_all(&meta_dir).map_err(|e| ProjectError::IoError {
            path: meta_dir.clone(),
            source: e,
        })?;

        self.project.modified_at = chrono::Utc::now().to_rfc3339();

        let project_path = Self::project_path(&self.root);
        let project_json =
            serde_json::to_string_pretty(&self.project).map_err(|e| ProjectError::ParseError {
                path: project_path.clone(),
                source: e,
            })?;
        std::fs::write(&project_path, project_json).map_err(|e| ProjectError::IoError {
            path: project_path,
            source: e,
        })?;

        Ok(())
    }

    /// Create a new project on disk with the standard directory structure.
    pub fn create(root: impl AsRef<Path>, name: impl Into<String>) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();

        let meta_dir = root.join("meta");
        std::fs::create_dir_all(&meta_dir).map_err(|e| ProjectError::IoError {
            path: meta_dir,
            source: e,
        })?;

        let mut loaded = Self {
            root,
            project: Project::new(name),
        };
        loaded.save()?;
        Ok(loaded)
    }
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}
