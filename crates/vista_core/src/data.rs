//! View data values and normalization of caller-supplied data.
//!
//! A [`ViewData`] map holds either plain JSON values or lazy values that are
//! resolved against the [`View`] being rendered. Once gathered, all lazy
//! values are resolved and the engine receives a plain [`RenderData`] map.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::view::View;

/// Fully resolved data handed to the template engine.
pub type RenderData = serde_json::Map<String, Value>;

/// A deferred value, computed from the view at render time.
pub type LazyValue = Rc<dyn Fn(&View<'_>) -> anyhow::Result<Value>>;

/// A single entry in a view data map.
#[derive(Clone)]
pub enum ViewValue {
    /// A plain value passed to the engine as-is.
    Value(Value),
    /// A callable replaced by its result when the view is rendered.
    Lazy(LazyValue),
}

impl ViewValue {
    /// Wrap a closure as a lazy value.
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn(&View<'_>) -> anyhow::Result<Value> + 'static,
    {
        Self::Lazy(Rc::new(f))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    /// Get the plain value, if this entry is not lazy.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Lazy(_) => None,
        }
    }

    /// Resolve this entry for the given view.
    pub fn resolve(&self, view: &View<'_>) -> anyhow::Result<Value> {
        match self {
            Self::Value(v) => Ok(v.clone()),
            Self::Lazy(f) => f(view),
        }
    }
}

impl fmt::Debug for ViewValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl<T> From<T> for ViewValue
where
    T: Into<Value>,
{
    fn from(value: T) -> Self {
        Self::Value(value.into())
    }
}

/// An ordered map of view data keys to values.
#[derive(Debug, Clone, Default)]
pub struct ViewData {
    entries: BTreeMap<String, ViewValue>,
}

impl ViewData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ViewValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert of a lazy value.
    pub fn with_lazy<F>(mut self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&View<'_>) -> anyhow::Result<Value> + 'static,
    {
        self.insert(key, ViewValue::lazy(f));
        self
    }

    /// Insert a value, replacing any existing entry for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ViewValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get an entry by key, lazy or not.
    pub fn get(&self, key: &str) -> Option<&ViewValue> {
        self.entries.get(key)
    }

    /// Get a plain value by key. Lazy entries return `None`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).and_then(ViewValue::as_value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Merge `other` into this map; keys in `other` win on collision.
    pub fn merge(&mut self, other: ViewData) {
        self.entries.extend(other.entries);
    }

    /// Merge a resolved map; keys in `other` win on collision.
    pub fn merge_resolved(&mut self, other: &RenderData) {
        for (key, value) in other {
            self.entries
                .insert(key.clone(), ViewValue::Value(value.clone()));
        }
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ViewValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every entry against `view`, invoking lazy values.
    pub fn resolve(&self, view: &View<'_>) -> CoreResult<RenderData> {
        let mut resolved = RenderData::new();
        for (key, value) in &self.entries {
            let value = value
                .resolve(view)
                .map_err(|source| CoreError::ValueResolution {
                    key: key.clone(),
                    source,
                })?;
            resolved.insert(key.clone(), value);
        }
        Ok(resolved)
    }
}

impl IntoIterator for ViewData {
    type Item = (String, ViewValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ViewValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ViewData
where
    K: Into<String>,
    V: Into<ViewValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

impl From<RenderData> for ViewData {
    fn from(map: RenderData) -> Self {
        map.into_iter().collect()
    }
}

impl TryFrom<Value> for ViewData {
    type Error = CoreError;

    fn try_from(value: Value) -> CoreResult<Self> {
        match value {
            Value::Object(map) => Ok(map.into()),
            Value::Null => Ok(Self::new()),
            other => Err(CoreError::InvalidDataShape(format!(
                "expected an object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Capability for host types that can present themselves as view data.
pub trait ToViewData {
    fn to_view_data(&self) -> ViewData;
}

impl ToViewData for ViewData {
    fn to_view_data(&self) -> ViewData {
        self.clone()
    }
}

impl ToViewData for RenderData {
    fn to_view_data(&self) -> ViewData {
        self.clone().into()
    }
}

/// Data supplied by a caller when making a view.
///
/// Conversion into [`ViewData`] happens once, when the view is made. Values
/// that are neither maps nor [`ToViewData`] objects become an empty map.
pub enum ViewInput {
    Empty,
    Data(ViewData),
    Json(Value),
    Object(Box<dyn ToViewData>),
}

impl ViewInput {
    /// Wrap an owned object exposing [`ToViewData`].
    pub fn object<T: ToViewData + 'static>(object: T) -> Self {
        Self::Object(Box::new(object))
    }

    /// Normalize into a data map.
    pub fn into_view_data(self) -> ViewData {
        match self {
            Self::Empty => ViewData::new(),
            Self::Data(data) => data,
            Self::Object(object) => object.to_view_data(),
            Self::Json(value) => ViewData::try_from(value).unwrap_or_else(|e| {
                warn!("Ignoring view data: {}", e);
                ViewData::new()
            }),
        }
    }
}

impl Default for ViewInput {
    fn default() -> Self {
        Self::Empty
    }
}

impl From<()> for ViewInput {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl From<ViewData> for ViewInput {
    fn from(data: ViewData) -> Self {
        Self::Data(data)
    }
}

impl From<Value> for ViewInput {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<RenderData> for ViewInput {
    fn from(map: RenderData) -> Self {
        Self::Data(map.into())
    }
}

impl<T: ToViewData> From<&T> for ViewInput {
    fn from(object: &T) -> Self {
        Self::Data(object.to_view_data())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
