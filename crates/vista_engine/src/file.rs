//! File-backed template engine.
//!
//! Templates are looked up under the configured locations, in order. Rendering
//! replaces `{{ key }}` placeholders (dotted keys reach into nested objects and
//! arrays) with values from the render data. Placeholders without a matching
//! value are left untouched.

use std::fs;
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use vista_core::{
    CoreResult, EngineConfig, NameResolver, RenderData, TemplateEngine, LOCATIONS_KEY,
};

use crate::error::{EngineError, EngineResult};
use crate::settings::EngineSettings;

/// Template engine reading templates from disk.
#[derive(Debug)]
pub struct FileEngine {
    config: EngineConfig,
    extensions: Vec<String>,
    placeholder: Regex,
}

impl Default for FileEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FileEngine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    /// Create an engine from settings.
    pub fn with_settings(settings: EngineSettings) -> Self {
        let config = EngineConfig::new();
        let locations: Vec<Value> = settings
            .locations
            .iter()
            .map(|p| Value::String(p.to_string_lossy().into_owned()))
            .collect();
        config.set(LOCATIONS_KEY, Value::Array(locations));
        config.set_many(settings.options);

        Self {
            config,
            extensions: NameResolver::new(&settings.extensions).extensions().to_vec(),
            // Match {{ key }} and {{ key.nested.0 }}
            placeholder: Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z0-9_]+)*)\s*\}\}")
                .expect("placeholder pattern is valid"),
        }
    }

    /// Create an engine from a YAML settings file.
    pub fn from_settings_file(path: &Path) -> EngineResult<Self> {
        Ok(Self::with_settings(EngineSettings::from_file(path)?))
    }

    /// Configured locations that exist on disk.
    pub fn locations(&self) -> Vec<PathBuf> {
        self.config
            .locations()
            .into_iter()
            .filter(|location| {
                let exists = location.is_dir();
                if !exists {
                    warn!("Template location does not exist: {:?}", location);
                }
                exists
            })
            .collect()
    }

    /// Find the file backing a template path.
    pub fn find(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            debug!("Rejecting template path outside locations: {}", path);
            return None;
        }

        self.locations()
            .into_iter()
            .map(|location| location.join(relative))
            .find(|candidate| candidate.is_file())
    }

    /// All templates with a recognized extension, as paths relative to
    /// their location. Earlier locations shadow later ones.
    pub fn templates(&self) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();

        for location in self.locations() {
            for entry in WalkDir::new(&location)
                .min_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let Ok(relative) = entry.path().strip_prefix(&location) else {
                    continue;
                };
                let name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                let recognized = self.extensions.iter().any(|ext| name.ends_with(ext.as_str()));
                if recognized && !found.contains(&name) {
                    found.push(name);
                }
            }
        }

        found
    }

    /// Render template content with the given data.
    pub fn render_str(&self, content: &str, data: &RenderData) -> String {
        self.placeholder
            .replace_all(content, |caps: &regex::Captures| {
                match lookup(data, &caps[1]) {
                    Some(value) => display(value),
                    None => caps[0].to_string(),
                }
            })
            .to_string()
    }

    fn load(&self, path: &str) -> EngineResult<String> {
        let file = self
            .find(path)
            .ok_or_else(|| EngineError::NotFound(path.to_string()))?;
        debug!("Loading template {} from {:?}", path, file);
        Ok(fs::read_to_string(file)?)
    }
}

impl TemplateEngine for FileEngine {
    fn render(&self, path: &str, data: &RenderData) -> CoreResult<String> {
        let content = self.load(path)?;
        Ok(self.render_str(&content, data))
    }

    fn exists(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    fn extensions(&self) -> Vec<String> {
        self.extensions.clone()
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Look up a dotted key in the render data.
fn lookup<'a>(data: &'a RenderData, key: &str) -> Option<&'a Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?)?;

    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
