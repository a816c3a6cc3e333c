//! # vista
//!
//! View composition for host applications.
//!
//! Re-exports [`vista_core`] and [`vista_engine`] and adds a per-thread
//! default factory with free functions for host code.
//!
//! ## Example
//!
//! ```rust,no_run
//! use serde_json::json;
//!
//! vista::share("site", "My Site").unwrap();
//! vista::composer("home", json!({"menu": ["home", "about"]})).unwrap();
//!
//! let html = vista::fetch("home", json!({"title": "Hi"})).unwrap();
//! ```

pub mod host;

pub use host::{
    composer, composer_fn, config, default_providers, exists, factory, fetch, install,
    register_providers, render, reset, share,
};
pub use vista_core::*;
pub use vista_engine::{EngineError, EngineResult, EngineSettings, FileEngine, MockEngine, RenderCall};
