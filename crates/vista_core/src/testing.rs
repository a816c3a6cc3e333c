//! Minimal engine used by unit tests.

use std::collections::HashSet;

use crate::data::RenderData;
use crate::engine::{EngineConfig, TemplateEngine};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Default)]
pub struct StubEngine {
    templates: HashSet<String>,
    config: EngineConfig,
}

impl StubEngine {
    pub fn with_templates<const N: usize>(templates: [&str; N]) -> Self {
        Self {
            templates: templates.iter().map(|t| t.to_string()).collect(),
            config: EngineConfig::new(),
        }
    }
}

impl TemplateEngine for StubEngine {
    fn render(&self, path: &str, data: &RenderData) -> CoreResult<String> {
        if !self.templates.contains(path) {
            return Err(CoreError::TemplateNotFound {
                path: path.to_string(),
            });
        }
        Ok(format!("{} {}", path, serde_json::Value::Object(data.clone())))
    }

    fn exists(&self, path: &str) -> bool {
        self.templates.contains(path)
    }

    fn extensions(&self) -> Vec<String> {
        vec![".html".to_string()]
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }
}
