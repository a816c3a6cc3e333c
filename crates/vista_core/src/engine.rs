//! The template engine collaborator.
//!
//! View composition never compiles templates itself. It hands a resolved
//! template path and the gathered data to a [`TemplateEngine`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;

use crate::data::RenderData;
use crate::error::CoreResult;

/// Config key holding the template base directories.
pub const LOCATIONS_KEY: &str = "locations";

/// Base directory searched when no locations are configured.
pub const DEFAULT_LOCATION: &str = "views";

/// A template engine that views render through.
pub trait TemplateEngine {
    /// Render the template at `path` with `data`.
    ///
    /// Fails with [`CoreError::TemplateNotFound`](crate::CoreError::TemplateNotFound)
    /// when nothing backs `path`.
    fn render(&self, path: &str, data: &RenderData) -> CoreResult<String>;

    /// Whether a template backs `path`.
    fn exists(&self, path: &str) -> bool;

    /// Recognized extension tokens, default first.
    fn extensions(&self) -> Vec<String>;

    /// The engine's configuration store.
    fn config(&self) -> &EngineConfig;
}

/// Key/value configuration store with documented defaults.
#[derive(Debug)]
pub struct EngineConfig {
    values: RefCell<HashMap<String, Value>>,
    defaults: HashMap<String, Value>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert(
            LOCATIONS_KEY.to_string(),
            Value::Array(vec![Value::String(DEFAULT_LOCATION.to_string())]),
        );
        Self::with_defaults(defaults)
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with its own defaults instead of `locations = ["views"]`.
    pub fn with_defaults(defaults: HashMap<String, Value>) -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
            defaults,
        }
    }

    /// Get a configured value, falling back to the default.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values
            .borrow()
            .get(key)
            .or_else(|| self.defaults.get(key))
            .cloned()
    }

    /// Set `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.borrow_mut().insert(key.into(), value.into());
    }

    pub fn set_many(&self, values: impl IntoIterator<Item = (String, Value)>) {
        self.values.borrow_mut().extend(values);
    }

    /// Whether `key` was set explicitly.
    pub fn is_set(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }

    /// Remove an explicit value so `get` falls back to the default again.
    pub fn unset(&self, key: &str) -> Option<Value> {
        self.values.borrow_mut().remove(key)
    }

    /// Template base directories, accepting a single string or a list.
    pub fn locations(&self) -> Vec<PathBuf> {
        match self.get(LOCATIONS_KEY) {
            Some(Value::String(path)) => vec![PathBuf::from(path)],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(PathBuf::from)
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_locations() {
        let config = EngineConfig::new();
        assert_eq!(config.locations(), vec![PathBuf::from("views")]);
        assert!(!config.is_set(LOCATIONS_KEY));
    }

    #[test]
    fn test_set_overrides_default() {
        let config = EngineConfig::new();
        config.set(LOCATIONS_KEY, "templates");
        assert_eq!(config.locations(), vec![PathBuf::from("templates")]);

        config.unset(LOCATIONS_KEY);
        assert_eq!(config.locations(), vec![PathBuf::from("views")]);
    }

    #[test]
    fn test_set_many() {
        let config = EngineConfig::new();
        config.set_many([
            ("debug".to_string(), json!(true)),
            ("charset".to_string(), json!("utf-8")),
        ]);
        assert_eq!(config.get("debug"), Some(json!(true)));
        assert_eq!(config.get("missing"), None);
    }
}
