//! Mock template engine for testing.
//!
//! Captures every render call and returns predefined output, so tests can
//! verify what a factory hands to its engine without templates on disk.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use vista_core::{CoreError, CoreResult, EngineConfig, RenderData, TemplateEngine};

/// A captured render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCall {
    pub path: String,
    pub data: RenderData,
}

/// Mock engine capturing render calls.
///
/// Clones share state, so a test can keep a handle after moving the engine
/// into a factory.
#[derive(Debug, Clone)]
pub struct MockEngine {
    /// Template path to output returned by render.
    templates: Rc<RefCell<HashMap<String, String>>>,
    /// Recognized extensions.
    extensions: Rc<RefCell<Vec<String>>>,
    /// Captured render calls.
    calls: Rc<RefCell<Vec<RenderCall>>>,
    /// Number of exists() lookups.
    lookups: Rc<Cell<usize>>,
    config: Rc<EngineConfig>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            templates: Rc::new(RefCell::new(HashMap::new())),
            extensions: Rc::new(RefCell::new(vec![".html".to_string()])),
            calls: Rc::new(RefCell::new(Vec::new())),
            lookups: Rc::new(Cell::new(0)),
            config: Rc::new(EngineConfig::new()),
        }
    }

    /// Back `path` with a template rendering to `output`.
    pub fn with_template(self, path: impl Into<String>, output: impl Into<String>) -> Self {
        self.templates.borrow_mut().insert(path.into(), output.into());
        self
    }

    /// Replace the extensions reported to the name resolver.
    pub fn with_extensions<I, S>(self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.extensions.borrow_mut() = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// All captured render calls.
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.borrow().clone()
    }

    /// The most recent render call, if any.
    pub fn last_call(&self) -> Option<RenderCall> {
        self.calls.borrow().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Number of `exists` lookups made against this engine.
    pub fn lookup_count(&self) -> usize {
        self.lookups.get()
    }
}

impl TemplateEngine for MockEngine {
    fn render(&self, path: &str, data: &RenderData) -> CoreResult<String> {
        self.calls.borrow_mut().push(RenderCall {
            path: path.to_string(),
            data: data.clone(),
        });

        self.templates
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| CoreError::TemplateNotFound {
                path: path.to_string(),
            })
    }

    fn exists(&self, path: &str) -> bool {
        self.lookups.set(self.lookups.get() + 1);
        self.templates.borrow().contains_key(path)
    }

    fn extensions(&self) -> Vec<String> {
        self.extensions.borrow().clone()
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }
}
