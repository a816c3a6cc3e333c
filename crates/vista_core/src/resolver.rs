//! View name resolution.
//!
//! Logical view names may use dots as path separators (`pages.home`) and may
//! omit the template extension. The resolver turns them into the relative
//! template path the engine is asked for (`pages/home.html`).

/// Extension appended when the engine reports none.
pub const DEFAULT_EXTENSION: &str = ".html";

/// Resolves logical view names into template paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResolver {
    extensions: Vec<String>,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new([DEFAULT_EXTENSION])
    }
}

impl NameResolver {
    /// Create a resolver for the given extension tokens.
    ///
    /// Tokens are normalized to start with a dot. The first token is the
    /// default extension; an empty list falls back to [`DEFAULT_EXTENSION`].
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.');
            if ext.is_empty() {
                continue;
            }
            let token = format!(".{}", ext);
            if !normalized.contains(&token) {
                normalized.push(token);
            }
        }

        if normalized.is_empty() {
            normalized.push(DEFAULT_EXTENSION.to_string());
        }

        Self {
            extensions: normalized,
        }
    }

    /// The recognized extension tokens, default first.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// The extension appended to names without a recognized one.
    pub fn default_extension(&self) -> &str {
        &self.extensions[0]
    }

    /// The longest recognized extension `name` ends with.
    pub fn trailing_extension(&self, name: &str) -> Option<&str> {
        self.extensions
            .iter()
            .filter(|ext| name.ends_with(ext.as_str()))
            .max_by_key(|ext| ext.len())
            .map(String::as_str)
    }

    /// Resolve a logical view name into a template path.
    ///
    /// An explicit recognized extension is kept as-is and only the dots before
    /// it become path separators. Otherwise every dot becomes a separator and
    /// the default extension is appended.
    pub fn resolve(&self, name: &str) -> String {
        if let Some(ext) = self.trailing_extension(name) {
            let stem = &name[..name.len() - ext.len()];
            return format!("{}{}", stem.replace('.', "/"), ext);
        }

        format!("{}{}", name.replace('.', "/"), self.default_extension())
    }
}
