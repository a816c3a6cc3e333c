//! Error types for engines.

use std::path::PathBuf;
use thiserror::Error;

use vista_core::CoreError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur inside a template engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Invalid engine settings in {source_name}: {message}")]
    InvalidSettings {
        source_name: String,
        message: String,
    },

    #[error("Settings file not found: {0}")]
    SettingsNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<EngineError> for CoreError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(path) => CoreError::TemplateNotFound { path },
            EngineError::Io(e) => CoreError::Io(e),
            other => CoreError::Engine(Box::new(other)),
        }
    }
}
