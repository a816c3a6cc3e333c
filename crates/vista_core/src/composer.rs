//! View composers and their registry.
//!
//! A composer contributes data to a view right before it renders. Composers
//! are one-shot: once a view has been rendered, the composers registered for
//! it (and all wildcard composers) are consumed.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::data::ViewData;
use crate::view::View;

/// Registry key matching every view.
pub const WILDCARD: &str = "*";

/// Callback producing partial view data.
pub type ComposerFn = Rc<dyn Fn(&View<'_>) -> anyhow::Result<ViewData>>;

/// Where a composer's data comes from.
///
/// Constants and callbacks are told apart once, at registration, so the
/// aggregator only ever calls [`ComposerSource::produce`].
#[derive(Clone)]
pub enum ComposerSource {
    Constant(ViewData),
    Callback(ComposerFn),
}

impl ComposerSource {
    /// Wrap a closure producing data for the view being rendered.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&View<'_>) -> anyhow::Result<ViewData> + 'static,
    {
        Self::Callback(Rc::new(f))
    }

    /// Produce this composer's data for `view`.
    pub fn produce(&self, view: &View<'_>) -> anyhow::Result<ViewData> {
        match self {
            Self::Constant(data) => Ok(data.clone()),
            Self::Callback(f) => f(view),
        }
    }
}

impl fmt::Debug for ComposerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(data) => f.debug_tuple("Constant").field(data).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<ViewData> for ComposerSource {
    fn from(data: ViewData) -> Self {
        Self::Constant(data)
    }
}

impl From<Value> for ComposerSource {
    fn from(value: Value) -> Self {
        let data = ViewData::try_from(value).unwrap_or_else(|e| {
            warn!("Composer constant ignored: {}", e);
            ViewData::new()
        });
        Self::Constant(data)
    }
}

/// One or more view names a composer is registered for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerTargets(Vec<String>);

impl ComposerTargets {
    /// Targets matching every view.
    pub fn wildcard() -> Self {
        Self(vec![WILDCARD.to_string()])
    }

    /// Target names as given, `*` included.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ComposerTargets {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for ComposerTargets {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for ComposerTargets {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for ComposerTargets {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for ComposerTargets {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ComposerTargets {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Composers keyed by resolved template path, plus the wildcard list.
///
/// Keys are stored as given; callers resolve view names before registering.
#[derive(Default)]
pub struct ComposerRegistry {
    views: HashMap<String, Vec<ComposerSource>>,
    wildcard: Vec<ComposerSource>,
}

impl ComposerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a composer for `key`, or for every view if `key` is `*`.
    pub fn register(&mut self, key: &str, source: ComposerSource) {
        if key == WILDCARD {
            debug!("Registering wildcard composer");
            self.wildcard.push(source);
            return;
        }

        debug!("Registering composer for {}", key);
        self.views.entry(key.to_string()).or_default().push(source);
    }

    /// Composers registered for exactly `key`, in registration order.
    pub fn get(&self, key: &str) -> &[ComposerSource] {
        self.views.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Wildcard composers, in registration order.
    pub fn wildcard(&self) -> &[ComposerSource] {
        &self.wildcard
    }

    /// Remove every composer registered for `key`.
    pub fn consume(&mut self, key: &str) -> Vec<ComposerSource> {
        let consumed = self.views.remove(key).unwrap_or_default();
        if !consumed.is_empty() {
            debug!("Consumed {} composer(s) for {}", consumed.len(), key);
        }
        consumed
    }

    /// Remove every wildcard composer.
    pub fn consume_wildcard(&mut self) -> Vec<ComposerSource> {
        std::mem::take(&mut self.wildcard)
    }

    /// Put consumed composers back ahead of any registered for `key` since.
    pub fn restore(&mut self, key: &str, mut sources: Vec<ComposerSource>) {
        if sources.is_empty() {
            return;
        }

        debug!("Restoring {} composer(s) for {}", sources.len(), key);
        let current = if key == WILDCARD {
            &mut self.wildcard
        } else {
            self.views.entry(key.to_string()).or_default()
        };
        sources.append(current);
        *current = sources;
    }

    /// Keys that currently have composers, excluding the wildcard.
    pub fn keys(&self) -> Vec<&str> {
        self.views.keys().map(String::as_str).collect()
    }

    /// Total number of pending composers, wildcard included.
    pub fn len(&self) -> usize {
        self.views.values().map(Vec::len).sum::<usize>() + self.wildcard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ComposerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerRegistry")
            .field("views", &self.views.keys().collect::<Vec<_>>())
            .field("wildcard", &self.wildcard.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn constant(key: &str, value: i64) -> ComposerSource {
        ComposerSource::Constant(ViewData::new().with(key, value))
    }

    #[test]
    fn test_register_appends_in_order() {
        let mut registry = ComposerRegistry::new();
        registry.register("home.html", constant("a", 1));
        registry.register("home.html", constant("a", 2));

        let composers = registry.get("home.html");
        assert_eq!(composers.len(), 2);
        match &composers[1] {
            ComposerSource::Constant(data) => assert_eq!(data.value("a"), Some(&json!(2))),
            other => panic!("unexpected composer {:?}", other),
        }
    }

    #[test]
    fn test_get_unknown_key_is_empty() {
        let registry = ComposerRegistry::new();
        assert!(registry.get("missing.html").is_empty());
        assert!(registry.wildcard().is_empty());
    }

    #[test]
    fn test_wildcard_kept_apart() {
        let mut registry = ComposerRegistry::new();
        registry.register(WILDCARD, constant("site", 1));
        registry.register("home.html", constant("page", 1));

        assert_eq!(registry.wildcard().len(), 1);
        assert_eq!(registry.get("home.html").len(), 1);
        assert_eq!(registry.keys(), vec!["home.html"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_consume_removes_exact_key_only() {
        let mut registry = ComposerRegistry::new();
        registry.register("home.html", constant("a", 1));
        registry.register("home.html", constant("a", 2));
        registry.register("about.html", constant("a", 3));

        assert_eq!(registry.consume("home.html").len(), 2);
        assert!(registry.get("home.html").is_empty());
        assert_eq!(registry.get("about.html").len(), 1);
    }

    #[test]
    fn test_consume_wildcard() {
        let mut registry = ComposerRegistry::new();
        registry.register(WILDCARD, constant("a", 1));
        registry.consume_wildcard();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_restore_goes_ahead_of_newer_entries() {
        let mut registry = ComposerRegistry::new();
        registry.register("home.html", constant("a", 1));
        registry.register(WILDCARD, constant("w", 1));
        let taken = registry.consume("home.html");
        let taken_wildcard = registry.consume_wildcard();

        registry.register("home.html", constant("a", 2));
        registry.restore("home.html", taken);
        registry.restore(WILDCARD, taken_wildcard);

        let composers = registry.get("home.html");
        assert_eq!(composers.len(), 2);
        match &composers[0] {
            ComposerSource::Constant(data) => assert_eq!(data.value("a"), Some(&json!(1))),
            other => panic!("unexpected composer {:?}", other),
        }
        assert_eq!(registry.wildcard().len(), 1);
    }

    #[test]
    fn test_non_object_constant_becomes_empty() {
        match ComposerSource::from(json!("just a string")) {
            ComposerSource::Constant(data) => assert!(data.is_empty()),
            other => panic!("unexpected composer {:?}", other),
        }
    }

    #[test]
    fn test_targets_conversions() {
        let targets = ComposerTargets::from(["home", "about"]);
        assert_eq!(targets.iter().collect::<Vec<_>>(), vec!["home", "about"]);
        assert_eq!(ComposerTargets::wildcard(), ComposerTargets::from("*"));
    }
}
