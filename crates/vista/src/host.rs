//! Default factory for host code.
//!
//! Each thread lazily boots its own [`Factory`] backed by a [`FileEngine`]
//! with the default composer providers installed. Hosts that need a
//! different engine or providers call [`install`] first.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};
use tracing::{debug, info};

use vista_core::{
    ComposerSource, ComposerTargets, CoreResult, Factory, GlobalData, Providers, ViewData,
    ViewInput, ViewValue,
};
use vista_engine::FileEngine;

thread_local! {
    static DEFAULT: RefCell<Option<Rc<Factory>>> = const { RefCell::new(None) };
}

/// Providers installed into a freshly booted default factory.
pub fn default_providers() -> Providers {
    vec![Box::new(GlobalData::new(
        "vista-globals",
        ViewData::new().with("vista", json!({ "version": env!("CARGO_PKG_VERSION") })),
    ))]
}

/// The default factory for this thread, booting it on first use.
pub fn factory() -> CoreResult<Rc<Factory>> {
    if let Some(factory) = DEFAULT.with(|slot| slot.borrow().clone()) {
        return Ok(factory);
    }

    info!("Booting default view factory");
    let factory = Factory::new(FileEngine::new());
    factory.load_providers(default_providers(), |providers| providers)?;
    Ok(install(factory))
}

/// Replace this thread's default factory.
pub fn install(factory: Factory) -> Rc<Factory> {
    let factory = Rc::new(factory);
    DEFAULT.with(|slot| *slot.borrow_mut() = Some(factory.clone()));
    debug!("Installed default view factory");
    factory
}

/// Drop this thread's default factory.
pub fn reset() {
    DEFAULT.with(|slot| slot.borrow_mut().take());
}

/// Register a composer with the default factory.
pub fn composer(
    targets: impl Into<ComposerTargets>,
    source: impl Into<ComposerSource>,
) -> CoreResult<()> {
    factory()?.composer(targets, source);
    Ok(())
}

/// Register a callback composer with the default factory.
pub fn composer_fn<F>(targets: impl Into<ComposerTargets>, f: F) -> CoreResult<()>
where
    F: Fn(&vista_core::View<'_>) -> anyhow::Result<ViewData> + 'static,
{
    factory()?.composer_fn(targets, f);
    Ok(())
}

/// Share a value with every view of the default factory.
pub fn share(key: impl Into<String>, value: impl Into<ViewValue>) -> CoreResult<()> {
    factory()?.share(key, value);
    Ok(())
}

/// Whether a template backs the view name.
pub fn exists(name: &str) -> bool {
    factory().map(|f| f.exists(name)).unwrap_or(false)
}

/// Render a view to a string.
pub fn fetch(name: &str, data: impl Into<ViewInput>) -> CoreResult<String> {
    factory()?.fetch(name, data)
}

/// Render a view to standard output.
pub fn render(name: &str, data: impl Into<ViewInput>) -> CoreResult<()> {
    factory()?.render(name, data)
}

/// Get a configuration value, or set it when `value` is given.
///
/// Setting returns the new value.
pub fn config(key: &str, value: Option<Value>) -> CoreResult<Option<Value>> {
    let factory = factory()?;
    let config = factory.engine().config();
    if let Some(value) = value {
        config.set(key, value);
    }
    Ok(config.get(key))
}

/// Install extra composer providers into the default factory.
pub fn register_providers<F>(providers: Providers, filter: F) -> CoreResult<usize>
where
    F: FnOnce(Providers) -> Providers,
{
    factory()?.load_providers(providers, filter)
}
