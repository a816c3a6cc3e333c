//! Engine settings, loadable from YAML.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use vista_core::{DEFAULT_EXTENSION, DEFAULT_LOCATION};

use crate::error::{EngineError, EngineResult};

/// Settings for a [`FileEngine`](crate::FileEngine).
///
/// ```yaml
/// locations:
///   - theme/views
///   - plugin/views
/// extensions: [".html", ".twig"]
/// options:
///   debug: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Base directories searched for templates, in order
    pub locations: Vec<PathBuf>,
    /// Recognized extensions, default first
    pub extensions: Vec<String>,
    /// Extra configuration passed through to the engine config store
    pub options: HashMap<String, serde_json::Value>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            locations: vec![PathBuf::from(DEFAULT_LOCATION)],
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            options: HashMap::new(),
        }
    }
}

impl EngineSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a location to the search list.
    ///
    /// The default `views` location stays first; use [`EngineSettings::locations`]
    /// to replace the list.
    pub fn location(mut self, path: impl Into<PathBuf>) -> Self {
        self.locations.push(path.into());
        self
    }

    /// Replace the search list.
    pub fn locations(mut self, paths: Vec<PathBuf>) -> Self {
        self.locations = paths;
        self
    }

    /// Replace the recognized extensions.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set an extra engine option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Parse settings from a YAML string.
    pub fn from_yaml_str(content: &str, source_name: &str) -> EngineResult<Self> {
        let settings: EngineSettings = serde_yaml::from_str(content)?;
        settings.validate(source_name)?;
        Ok(settings)
    }

    /// Load settings from a YAML file.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        if !path.exists() {
            return Err(EngineError::SettingsNotFound(path.to_path_buf()));
        }

        debug!("Loading engine settings from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    /// Check that the settings are usable.
    pub fn validate(&self, source_name: &str) -> EngineResult<()> {
        if self.extensions.iter().all(|ext| ext.trim_matches(['.', ' ']).is_empty()) {
            return Err(EngineError::InvalidSettings {
                source_name: source_name.to_string(),
                message: "at least one extension is required".to_string(),
            });
        }

        if self.locations.is_empty() {
            return Err(EngineError::InvalidSettings {
                source_name: source_name.to_string(),
                message: "at least one location is required".to_string(),
            });
        }

        Ok(())
    }
}
