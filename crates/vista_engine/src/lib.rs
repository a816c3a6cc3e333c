//! # vista_engine
//!
//! Template engines for vista.
//!
//! - [`FileEngine`]: Reads templates from configured locations and fills
//!   `{{ key }}` placeholders
//! - [`MockEngine`]: Captures render calls for tests
//! - [`EngineSettings`]: Locations, extensions and options, loadable from YAML
//!
//! ## Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use vista_core::Factory;
//! use vista_engine::{EngineSettings, FileEngine};
//!
//! let engine = FileEngine::with_settings(EngineSettings::new().locations(vec!["views".into()]));
//! let factory = Factory::new(engine);
//!
//! let html = factory.fetch("pages.home", json!({"title": "Hi"})).unwrap();
//! ```

pub mod error;
pub mod file;
pub mod mock;
pub mod settings;

pub use error::{EngineError, EngineResult};
pub use file::FileEngine;
pub use mock::{MockEngine, RenderCall};
pub use settings::EngineSettings;
