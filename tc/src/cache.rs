//! Template cache
//!
//! Compiles each named template at most once and hands out the same
//! compiled instance on every later lookup. Entries are never evicted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CacheError;
use crate::source::TemplateSource;
use crate::template::{CompiledTemplate, RenderOptions};

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups served from the registry
    pub hits: u64,
    /// Templates resolved and compiled successfully
    pub compiles: u64,
    /// Templates currently cached
    pub cached: usize,
}

/// A template that failed to compile during [`TemplateCache::preload`]
#[derive(Debug)]
pub struct PreloadFailure {
    pub name: String,
    pub error: CacheError,
}

/// Lazily compiling, never-evicting template registry
pub struct TemplateCache<S> {
    source: S,
    options: RenderOptions,
    templates: Mutex<HashMap<String, Arc<CompiledTemplate>>>,
    hits: AtomicU64,
    compiles: AtomicU64,
}

impl<S: TemplateSource> TemplateCache<S> {
    /// Create an empty cache over `source` with default render options
    pub fn new(source: S) -> Self {
        Self::with_options(source, RenderOptions::default())
    }

    /// Create an empty cache over `source`
    pub fn with_options(source: S, options: RenderOptions) -> Self {
        Self {
            source,
            options,
            templates: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            compiles: AtomicU64::new(0),
        }
    }

    /// Return the compiled template for `name`, compiling it on first use
    ///
    /// The registry lock is held while the source is read and compiled, so
    /// concurrent first lookups of the same name still compile once. Failed
    /// lookups leave the registry untouched.
    pub fn load_template(&self, name: &str) -> Result<Arc<CompiledTemplate>, CacheError> {
        let mut templates = self.lock();

        if let Some(template) = templates.get(name) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(template));
        }

        debug!(%name, "Template cache miss");
        let source = self.source.resolve(name)?.ok_or_else(|| CacheError::NotFound {
            name: name.to_string(),
        })?;
        let template = Arc::new(CompiledTemplate::compile(name, &source, self.options)?);

        self.compiles.fetch_add(1, Ordering::Relaxed);
        templates.insert(name.to_string(), Arc::clone(&template));
        debug!(%name, cached = templates.len(), "Compiled and cached template");

        Ok(template)
    }

    /// Load `name` and render it with `data`
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, CacheError> {
        self.load_template(name)?.render(data)
    }

    /// Compile every template the source can list
    ///
    /// Keeps going past failures and returns them; an error listing the
    /// source's names is returned directly.
    pub fn preload(&self) -> Result<Vec<PreloadFailure>, CacheError> {
        let names = self.source.names()?;
        info!(count = names.len(), source = %self.source.describe(), "Preloading templates");

        let failures: Vec<PreloadFailure> = names
            .into_iter()
            .filter_map(|name| match self.load_template(&name) {
                Ok(_) => None,
                Err(error) => Some(PreloadFailure { name, error }),
            })
            .collect();

        info!(failed = failures.len(), cached = self.len(), "Preload finished");
        Ok(failures)
    }

    /// Whether `name` has already been compiled
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Names of all compiled templates, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            compiles: self.compiles.load(Ordering::Relaxed),
            cached: self.len(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    // Entries are only inserted after a successful compile, so a poisoned
    // map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<CompiledTemplate>>> {
        self.templates.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: TemplateSource> std::fmt::Debug for TemplateCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateCache")
            .field("source", &self.source.describe())
            .field("options", &self.options)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{EmbeddedSource, HtmlDocument};
    use serde_json::json;

    fn greeting_cache() -> TemplateCache<EmbeddedSource> {
        TemplateCache::new(
            EmbeddedSource::new()
                .with("greeting", "Hello, {{name}}!")
                .with("broken", "{{#if ok}}mismatched{{/each}}"),
        )
    }

    #[test]
    fn test_starts_empty() {
        let cache = greeting_cache();

        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_load_renders_greeting() {
        let cache = greeting_cache();
        let tpl = cache.load_template("greeting").unwrap();

        assert_eq!(tpl.render(&json!({"name": "World"})).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_same_instance_returned() {
        let cache = greeting_cache();
        let first = cache.load_template("greeting").unwrap();
        let second = cache.load_template("greeting").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                compiles: 1,
                cached: 1
            }
        );
    }

    #[test]
    fn test_not_found() {
        let cache = greeting_cache();
        let err = cache.load_template("nonexistent").unwrap_err();

        assert!(err.is_not_found());
        assert!(!cache.contains("nonexistent"));
    }

    #[test]
    fn test_compile_failure_not_cached() {
        let cache = greeting_cache();

        assert!(cache.load_template("broken").unwrap_err().is_compile());
        assert!(cache.load_template("broken").unwrap_err().is_compile());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().compiles, 0);
    }

    #[test]
    fn test_render_convenience() {
        let cache = greeting_cache();

        assert_eq!(cache.render("greeting", &json!({"name": "Rust"})).unwrap(), "Hello, Rust!");
        assert!(cache.render("nonexistent", &json!({})).unwrap_err().is_not_found());
    }

    #[test]
    fn test_preload_collects_failures() {
        let cache = greeting_cache();
        let failures = cache.preload().unwrap();

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "broken");
        assert!(failures[0].error.is_compile());
        assert_eq!(cache.names(), vec!["greeting"]);
    }

    #[test]
    fn test_preload_then_load_is_a_hit() {
        let cache = TemplateCache::new(HtmlDocument::parse(
            r#"<script type="text/x-handlebars-template" id="greeting">Hello, {{name}}!</script>"#,
        ));
        cache.preload().unwrap();
        cache.load_template("greeting").unwrap();

        assert_eq!(cache.stats().compiles, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_options_applied() {
        let cache = TemplateCache::with_options(
            EmbeddedSource::new().with("raw", "{{html}}"),
            RenderOptions {
                escape_html: false,
                ..Default::default()
            },
        );

        assert_eq!(cache.render("raw", &json!({"html": "<em>"})).unwrap(), "<em>");
    }
}
