//! A named view with its data, ready to render.

use crate::data::{RenderData, ViewData};
use crate::error::CoreResult;
use crate::factory::Factory;

/// A view made by a [`Factory`].
///
/// Name, path and data are fixed at construction. Rendering gathers shared
/// and composer data through the factory, so rendering the same view twice
/// can produce different output: composers fire only for the first render.
#[derive(Debug)]
pub struct View<'f> {
    factory: &'f Factory,
    name: String,
    path: String,
    data: ViewData,
}

impl<'f> View<'f> {
    pub(crate) fn new(factory: &'f Factory, name: String, path: String, data: ViewData) -> Self {
        Self {
            factory,
            name,
            path,
            data,
        }
    }

    /// The logical name the view was made with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved template path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Data supplied when the view was made.
    pub fn data(&self) -> &ViewData {
        &self.data
    }

    pub fn factory(&self) -> &'f Factory {
        self.factory
    }

    /// Gather the merged data this view would render with.
    ///
    /// Consumes the view's composers just like [`View::render`].
    pub fn gather(&self) -> CoreResult<RenderData> {
        self.factory.gather(self)
    }

    /// Render the view to a string.
    pub fn render(&self) -> CoreResult<String> {
        self.factory.render_view(self)
    }
}
