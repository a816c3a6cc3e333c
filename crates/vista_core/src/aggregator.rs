//! Gathering of render data from all sources.
//!
//! Sources merge lowest to highest precedence:
//!
//! 1. Shared data
//! 2. Data of the enclosing render, when rendering a nested view
//! 3. The view's own data
//! 4. Composers registered for the view, in registration order
//! 5. Wildcard composers, in registration order
//!
//! Lazy values are resolved after merging, against the view being rendered.

use std::cell::RefCell;

use tracing::debug;

use crate::composer::ComposerSource;
use crate::data::{RenderData, ViewData};
use crate::error::{CoreError, CoreResult};
use crate::view::View;

/// Everything a gather merges besides the view itself.
#[derive(Debug, Clone, Copy)]
pub struct GatherSources<'a> {
    pub shared: &'a ViewData,
    pub parent: Option<&'a RenderData>,
    pub composers: &'a [ComposerSource],
    pub wildcard: &'a [ComposerSource],
}

/// Merges view data and tracks the data of renders in progress.
#[derive(Debug, Default)]
pub struct DataAggregator {
    frames: RefCell<Vec<RenderData>>,
}

impl DataAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge all sources for `view` and resolve lazy values.
    pub fn gather(&self, view: &View<'_>, sources: GatherSources<'_>) -> CoreResult<RenderData> {
        let mut merged = sources.shared.clone();

        if let Some(parent) = sources.parent {
            merged.merge_resolved(parent);
        }

        merged.merge(view.data().clone());

        for composer in sources.composers.iter().chain(sources.wildcard) {
            let produced = composer
                .produce(view)
                .map_err(|source| CoreError::ComposerInvocation {
                    view: view.path().to_string(),
                    source,
                })?;
            merged.merge(produced);
        }

        debug!(
            "Gathered {} key(s) for {} ({} composer(s), {} wildcard)",
            merged.len(),
            view.path(),
            sources.composers.len(),
            sources.wildcard.len()
        );

        merged.resolve(view)
    }

    /// Data of the innermost render in progress.
    pub fn current(&self) -> Option<RenderData> {
        self.frames.borrow().last().cloned()
    }

    /// Number of renders in progress.
    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Mark `data` as the data of a render in progress until the guard drops.
    pub fn enter(&self, data: RenderData) -> FrameGuard<'_> {
        self.frames.borrow_mut().push(data);
        FrameGuard {
            frames: &self.frames,
        }
    }
}

/// Pops a render frame when dropped.
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct FrameGuard<'a> {
    frames: &'a RefCell<Vec<RenderData>>,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.frames.borrow_mut().pop();
    }
}
