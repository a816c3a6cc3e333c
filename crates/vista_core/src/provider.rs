//! Composer providers: bundles of shared data and composers installed
//! into a factory at startup.
//!
//! Hosts receive the default providers before they are installed and may
//! add, drop or replace entries through a filter function.

use tracing::debug;

use crate::composer::{ComposerSource, ComposerTargets};
use crate::data::ViewData;
use crate::error::CoreResult;
use crate::factory::Factory;

/// Something that installs shared data or composers into a factory.
pub trait ComposerProvider {
    /// Name used in logs and by host filters.
    fn name(&self) -> &str;

    /// Install into `factory`.
    fn provide(&self, factory: &Factory) -> CoreResult<()>;
}

/// An ordered list of providers.
pub type Providers = Vec<Box<dyn ComposerProvider>>;

/// Shares a fixed set of data with every view.
#[derive(Debug, Clone)]
pub struct GlobalData {
    name: String,
    data: ViewData,
}

impl GlobalData {
    pub fn new(name: impl Into<String>, data: ViewData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn data(&self) -> &ViewData {
        &self.data
    }
}

impl ComposerProvider for GlobalData {
    fn name(&self) -> &str {
        &self.name
    }

    fn provide(&self, factory: &Factory) -> CoreResult<()> {
        debug!("Sharing {} global key(s) from {}", self.data.len(), self.name);
        factory.share_all(self.data.clone());
        Ok(())
    }
}

/// Registers a fixed list of composers.
#[derive(Debug, Clone, Default)]
pub struct ComposerSet {
    name: String,
    entries: Vec<(ComposerTargets, ComposerSource)>,
}

impl ComposerSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn composer(
        mut self,
        targets: impl Into<ComposerTargets>,
        source: impl Into<ComposerSource>,
    ) -> Self {
        self.entries.push((targets.into(), source.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ComposerProvider for ComposerSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn provide(&self, factory: &Factory) -> CoreResult<()> {
        for (targets, source) in &self.entries {
            factory.composer(targets.clone(), source.clone());
        }
        Ok(())
    }
}
