//! # vista_core
//!
//! View composition in front of a template engine.
//!
//! This crate resolves logical view names to template paths, merges data
//! from shared values, view data and composers, and hands the result to a
//! [`TemplateEngine`] for rendering.
//!
//! # Architecture
//!
//! - **Resolver**: Turns `pages.home` into `pages/home.html`
//! - **Composers**: One-shot callbacks that add data right before a view renders
//! - **Aggregator**: Merges all data sources in precedence order
//! - **Factory**: Owns the engine, shared data and composers; makes views
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use vista_core::{Factory, ViewData};
//!
//! let factory = Factory::new(my_engine);
//! factory.share("site", "My Site");
//! factory.composer("home", ViewData::new().with("menu", json!(["home", "about"])));
//!
//! let html = factory.make("home", json!({"title": "Hi"})).render()?;
//! ```

pub mod aggregator;
pub mod composer;
pub mod data;
pub mod engine;
pub mod error;
pub mod factory;
pub mod provider;
pub mod resolver;
pub mod view;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use aggregator::{DataAggregator, FrameGuard, GatherSources};
pub use composer::{ComposerFn, ComposerRegistry, ComposerSource, ComposerTargets, WILDCARD};
pub use data::{LazyValue, RenderData, ToViewData, ViewData, ViewInput, ViewValue};
pub use engine::{EngineConfig, TemplateEngine, DEFAULT_LOCATION, LOCATIONS_KEY};
pub use error::{CoreError, CoreResult};
pub use factory::Factory;
pub use provider::{ComposerProvider, ComposerSet, GlobalData, Providers};
pub use resolver::{NameResolver, DEFAULT_EXTENSION};
pub use view::View;
