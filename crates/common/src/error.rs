//! Error types shared across Cutroom crates.

use std::path::PathBuf;

/// Top-level error type for Cutroom operations.
#[derive(Debug, thiserror::Error)]
pub enum CutroomError {
    #[error("Edit rejected: {message}")]
    Edit { message: String },

    #[error("Render engine error: {message}")]
    Engine { message: String },

    #[error("Project error: {message}")]
    Project { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CutroomError.
pub type CutroomResult<T> = Result<T, CutroomError>;

impl CutroomError {
    pub fn edit(msg: impl Into<String>) -> Self {
        Self::Edit {
            message: msg.into(),
        }
    }

    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_constructors_format_messages() {
        assert_eq!(
            CutroomError::edit("clip overlaps").to_string(),
            "Edit rejected: clip overlaps"
        );
        assert_eq!(
            CutroomError::engine("connection refused").to_string(),
            "Render engine error: connection refused"
        );
    }

    #[test]
    fn test_io_error_converts_transparently() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CutroomError = io.into();
        assert_eq!(err.to_string(), "gone");
    }
}
