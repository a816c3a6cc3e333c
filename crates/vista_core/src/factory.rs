//! The view factory.
//!
//! The factory owns the template engine, shared data and registered
//! composers. It resolves view names, makes views and drives their
//! rendering.
//!
//! The factory is single-threaded: composers are consumed and render frames
//! are tracked during rendering, so renders against one factory must not
//! interleave. Hosts serving concurrent requests use one factory per request
//! or thread.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};

use tracing::{debug, info};

use crate::aggregator::{DataAggregator, GatherSources};
use crate::composer::{ComposerRegistry, ComposerSource, ComposerTargets, WILDCARD};
use crate::data::{RenderData, ViewData, ViewInput, ViewValue};
use crate::engine::TemplateEngine;
use crate::error::CoreResult;
use crate::provider::Providers;
use crate::resolver::NameResolver;
use crate::view::View;

/// Resolves, composes and renders views through a template engine.
pub struct Factory {
    engine: Box<dyn TemplateEngine>,
    composers: RefCell<ComposerRegistry>,
    shared: RefCell<ViewData>,
    aggregator: DataAggregator,
}

impl Factory {
    /// Create a factory rendering through `engine`.
    pub fn new(engine: impl TemplateEngine + 'static) -> Self {
        Self::with_engine(Box::new(engine))
    }

    pub fn with_engine(engine: Box<dyn TemplateEngine>) -> Self {
        Self {
            engine,
            composers: RefCell::new(ComposerRegistry::new()),
            shared: RefCell::new(ViewData::new()),
            aggregator: DataAggregator::new(),
        }
    }

    pub fn engine(&self) -> &dyn TemplateEngine {
        self.engine.as_ref()
    }

    /// Name resolver for the engine's current extensions.
    pub fn resolver(&self) -> NameResolver {
        NameResolver::new(self.engine.extensions())
    }

    /// Resolve a logical view name into a template path.
    pub fn view(&self, name: &str) -> String {
        self.resolver().resolve(name)
    }

    /// Share a value with every view.
    pub fn share(&self, key: impl Into<String>, value: impl Into<ViewValue>) -> &Self {
        self.shared.borrow_mut().insert(key, value);
        self
    }

    /// Share every entry of `data` with every view.
    pub fn share_all(&self, data: impl Into<ViewInput>) -> &Self {
        let data: ViewInput = data.into();
        self.shared.borrow_mut().merge(data.into_view_data());
        self
    }

    /// All shared data.
    pub fn shared(&self) -> ViewData {
        self.shared.borrow().clone()
    }

    /// Register a composer for one or more views, or `*` for all views.
    pub fn composer(
        &self,
        targets: impl Into<ComposerTargets>,
        source: impl Into<ComposerSource>,
    ) -> &Self {
        let targets: ComposerTargets = targets.into();
        let source: ComposerSource = source.into();
        let resolver = self.resolver();
        let mut registry = self.composers.borrow_mut();

        for target in targets.iter() {
            if target == WILDCARD {
                registry.register(WILDCARD, source.clone());
            } else {
                registry.register(&resolver.resolve(target), source.clone());
            }
        }

        self
    }

    /// Register a callback composer.
    pub fn composer_fn<F>(&self, targets: impl Into<ComposerTargets>, f: F) -> &Self
    where
        F: Fn(&View<'_>) -> anyhow::Result<ViewData> + 'static,
    {
        self.composer(targets, ComposerSource::callback(f))
    }

    /// Composers pending for a view name.
    pub fn composers_for(&self, name: &str) -> Vec<ComposerSource> {
        let path = self.view(name);
        self.composers.borrow().get(&path).to_vec()
    }

    /// Pending wildcard composers.
    pub fn wildcard_composers(&self) -> Vec<ComposerSource> {
        self.composers.borrow().wildcard().to_vec()
    }

    /// Drop every pending wildcard composer.
    pub fn reset_wildcard_composers(&self) {
        self.composers.borrow_mut().consume_wildcard();
    }

    /// Whether a template backs the view name. Never fails.
    pub fn exists(&self, name: &str) -> bool {
        self.engine.exists(&self.view(name))
    }

    /// Make a view for `name` with `data`.
    ///
    /// Existence is not checked here; a missing template surfaces when the
    /// view renders.
    pub fn make(&self, name: &str, data: impl Into<ViewInput>) -> View<'_> {
        let data: ViewInput = data.into();
        View::new(self, name.to_string(), self.view(name), data.into_view_data())
    }

    /// Render a view to a string.
    pub fn fetch(&self, name: &str, data: impl Into<ViewInput>) -> CoreResult<String> {
        self.make(name, data).render()
    }

    /// Render a view into `out`.
    pub fn render_to<W: Write>(
        &self,
        name: &str,
        data: impl Into<ViewInput>,
        out: &mut W,
    ) -> CoreResult<()> {
        let output = self.fetch(name, data)?;
        out.write_all(output.as_bytes())?;
        Ok(())
    }

    /// Render a view to standard output.
    pub fn render(&self, name: &str, data: impl Into<ViewInput>) -> CoreResult<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(name, data, &mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Gather the merged data for `view` and consume its composers.
    ///
    /// Composers are taken out of the registry before they run, so views
    /// rendered from inside a composer or lazy value do not fire them again.
    /// If gathering fails they are put back ahead of any registered since.
    pub fn gather(&self, view: &View<'_>) -> CoreResult<RenderData> {
        let shared = self.shared();
        let (composers, wildcard) = {
            let mut registry = self.composers.borrow_mut();
            (registry.consume(view.path()), registry.consume_wildcard())
        };
        let parent = self.aggregator.current();

        let result = self.aggregator.gather(
            view,
            GatherSources {
                shared: &shared,
                parent: parent.as_ref(),
                composers: &composers,
                wildcard: &wildcard,
            },
        );

        if result.is_err() {
            let mut registry = self.composers.borrow_mut();
            registry.restore(view.path(), composers);
            registry.restore(WILDCARD, wildcard);
        }

        result
    }

    /// Render `view` through the engine.
    ///
    /// Views rendered while this one is rendering see its gathered data.
    pub fn render_view(&self, view: &View<'_>) -> CoreResult<String> {
        let data = self.gather(view)?;
        debug!("Rendering {} as {}", view.name(), view.path());

        let _frame = self.aggregator.enter(data.clone());
        self.engine.render(view.path(), &data)
    }

    /// Data of the innermost render in progress.
    pub fn current_data(&self) -> Option<RenderData> {
        self.aggregator.current()
    }

    /// Install composer providers after passing them through `filter`.
    ///
    /// Returns the number of providers installed.
    pub fn load_providers<F>(&self, defaults: Providers, filter: F) -> CoreResult<usize>
    where
        F: FnOnce(Providers) -> Providers,
    {
        let offered = defaults.len();
        let providers = filter(defaults);
        info!(
            "Loading {} composer provider(s) ({} offered)",
            providers.len(),
            offered
        );

        for provider in &providers {
            debug!("Installing provider: {}", provider.name());
            provider.provide(self)?;
        }

        Ok(providers.len())
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("extensions", &self.engine.extensions())
            .field("composers", &*self.composers.borrow())
            .field("shared", &self.shared.borrow().keys().collect::<Vec<_>>())
            .field("depth", &self.aggregator.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::error::CoreError;
    use crate::provider::{ComposerProvider, ComposerSet, GlobalData};
    use crate::testing::StubEngine;
    use mockall::mock;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    mock! {
        pub Engine {}

        impl TemplateEngine for Engine {
            fn render(&self, path: &str, data: &RenderData) -> CoreResult<String>;
            fn exists(&self, path: &str) -> bool;
            fn extensions(&self) -> Vec<String>;
            fn config(&self) -> &EngineConfig;
        }
    }

    #[test]
    fn test_make_resolves_name() {
        let factory = Factory::new(StubEngine::default());
        let view = factory.make("pages.home", json!({"title": "Hi"}));

        assert_eq!(view.name(), "pages.home");
        assert_eq!(view.path(), "pages/home.html");
        assert_eq!(view.data().value("title"), Some(&json!("Hi")));
    }

    #[test]
    fn test_make_delegates_to_engine() {
        let mut engine = MockEngine::new();
        engine
            .expect_extensions()
            .returning(|| vec![".html".to_string()]);
        engine
            .expect_render()
            .withf(|path, data| path == "home.html" && data.get("title") == Some(&json!("Hi")))
            .times(1)
            .returning(|_, _| Ok("<h1>Hi</h1>".to_string()));

        let factory = Factory::new(engine);
        let output = factory.fetch("home", json!({"title": "Hi"})).unwrap();
        assert_eq!(output, "<h1>Hi</h1>");
    }

    #[test]
    fn test_exists_never_fails() {
        let mut engine = MockEngine::new();
        engine
            .expect_extensions()
            .returning(|| vec![".twig".to_string()]);
        engine
            .expect_exists()
            .withf(|path| path == "missing/page.twig")
            .returning(|_| false);

        let factory = Factory::new(engine);
        assert!(!factory.exists("missing.page"));
    }

    #[test]
    fn test_missing_template_surfaces_on_render() {
        let factory = Factory::new(StubEngine::default());
        let view = factory.make("nowhere", ());
        assert!(matches!(
            view.render(),
            Err(CoreError::TemplateNotFound { ref path }) if path == "nowhere.html"
        ));
    }

    #[test]
    fn test_composer_is_one_shot() {
        let factory = Factory::new(StubEngine::with_templates(["home.html"]));
        factory.composer("home", ViewData::new().with("greeting", "hello"));

        let first = factory.make("home", ()).gather().unwrap();
        assert_eq!(first["greeting"], json!("hello"));

        let second = factory.make("home", ()).gather().unwrap();
        assert!(!second.contains_key("greeting"));
    }

    #[test]
    fn test_composer_registered_twice_fires_twice() {
        let calls = Rc::new(Cell::new(0));
        let factory = Factory::new(StubEngine::default());
        for _ in 0..2 {
            let calls = calls.clone();
            factory.composer_fn("home", move |_| {
                calls.set(calls.get() + 1);
                Ok(ViewData::new())
            });
        }
        assert_eq!(factory.composers_for("home").len(), 2);

        factory.make("home", ()).gather().unwrap();
        factory.make("home", ()).gather().unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_composer_keys_resolved() {
        let factory = Factory::new(StubEngine::default());
        factory.composer(["pages.home", "pages/home.html", "*"], json!({"x": 1}));

        assert_eq!(factory.composers_for("pages.home").len(), 2);
        assert_eq!(factory.wildcard_composers().len(), 1);
    }

    #[test]
    fn test_wildcard_consumed_after_any_render() {
        let factory = Factory::new(StubEngine::default());
        factory.composer("*", json!({"site": "vista"}));

        let first = factory.make("home", ()).gather().unwrap();
        assert_eq!(first["site"], json!("vista"));

        let second = factory.make("about", ()).gather().unwrap();
        assert!(!second.contains_key("site"));
    }

    #[test]
    fn test_failed_composer_is_not_consumed() {
        let factory = Factory::new(StubEngine::default());
        factory.composer_fn("home", |_| anyhow::bail!("boom"));

        assert!(factory.make("home", ()).gather().is_err());
        assert_eq!(factory.composers_for("home").len(), 1);
    }

    #[test]
    fn test_reset_wildcard_composers() {
        let factory = Factory::new(StubEngine::default());
        factory.composer("*", json!({"a": 1}));
        factory.reset_wildcard_composers();
        assert!(factory.wildcard_composers().is_empty());
    }

    #[test]
    fn test_share_chaining() {
        let factory = Factory::new(StubEngine::default());
        factory
            .share("x", 1)
            .share_all(json!({"y": 2, "x": 3}));

        let shared = factory.shared();
        assert_eq!(shared.value("x"), Some(&json!(3)));
        assert_eq!(shared.value("y"), Some(&json!(2)));
    }

    #[test]
    fn test_composer_may_use_factory_while_gathering() {
        let factory = Factory::new(StubEngine::default());
        factory.composer_fn("home", |view| {
            view.factory().share("seen", true);
            Ok(ViewData::new().with("composed", view.path()))
        });

        let data = factory.make("home", ()).gather().unwrap();
        assert_eq!(data["composed"], json!("home.html"));
        assert_eq!(factory.shared().value("seen"), Some(&json!(true)));
    }

    #[test]
    fn test_load_providers_through_filter() {
        let factory = Factory::new(StubEngine::default());
        let defaults: Providers = vec![
            Box::new(GlobalData::new("globals", ViewData::new().with("site", "vista"))),
            Box::new(ComposerSet::new("menus").composer("*", json!({"menu": ["home"]}))),
        ];

        let loaded = factory
            .load_providers(defaults, |providers| {
                providers
                    .into_iter()
                    .filter(|p| p.name() != "menus")
                    .collect()
            })
            .unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(factory.shared().value("site"), Some(&json!("vista")));
        assert!(factory.wildcard_composers().is_empty());
    }

    struct Failing;

    impl ComposerProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn provide(&self, _factory: &Factory) -> CoreResult<()> {
            Err(CoreError::InvalidDataShape("bad provider".to_string()))
        }
    }

    #[test]
    fn test_provider_error_propagates() {
        let factory = Factory::new(StubEngine::default());
        let providers: Providers = vec![Box::new(Failing)];
        let result = factory.load_providers(providers, |p| p);
        assert!(result.is_err());
    }
}
