//! Error types for view composition.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while making or rendering views.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Template not found: {path}")]
    TemplateNotFound { path: String },

    #[error("Invalid view data: {0}")]
    InvalidDataShape(String),

    #[error("Composer for view {view} failed: {source}")]
    ComposerInvocation {
        view: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Resolving value for key '{key}' failed: {source}")]
    ValueResolution {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Engine error: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether this error means the resolved path has no backing template.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TemplateNotFound { .. })
    }
}
