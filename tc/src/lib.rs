//! templatecache - compile-once Handlebars template cache
//!
//! Looks up templates by name, compiles each one the first time it is
//! requested and hands back the same compiled instance on every later
//! request. Templates come from any [`TemplateSource`]: script blocks in an
//! HTML page, files in a directory, in-memory strings, or a layered stack of
//! those.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use templatecache::{HtmlDocument, TemplateCache};
//!
//! let page = r#"<script type="text/x-handlebars-template" id="greeting">Hello, {{name}}!</script>"#;
//! let cache = TemplateCache::new(HtmlDocument::parse(page));
//!
//! let greeting = cache.load_template("greeting")?;
//! assert_eq!(greeting.render(&serde_json::json!({"name": "World"}))?, "Hello, World!");
//! assert!(Arc::ptr_eq(&greeting, &cache.load_template("greeting")?));
//! # Ok::<(), templatecache::CacheError>(())
//! ```
//!
//! # Modules
//!
//! - [`cache`] - The template registry
//! - [`template`] - Compiled template handle and render options
//! - [`source`] - Template sources
//! - [`markup`] - Script block emission
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod markup;
pub mod source;
pub mod template;

// Re-export commonly used types
pub use cache::{CacheStats, PreloadFailure, TemplateCache};
pub use config::Config;
pub use error::CacheError;
pub use markup::{ScriptStyle, script_block};
pub use source::{DirectorySource, EmbeddedSource, HtmlDocument, LayeredSource, TemplateSource};
pub use template::{CompiledTemplate, RenderOptions};
