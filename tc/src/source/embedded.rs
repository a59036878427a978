//! In-memory templates
//!
//! Useful for templates compiled into the binary and as the last layer of
//! a [`LayeredSource`](super::LayeredSource).

use std::collections::BTreeMap;

use super::TemplateSource;
use crate::error::CacheError;

/// Templates held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSource {
    templates: BTreeMap<String, String>,
}

impl EmbeddedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, builder style
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    /// Add or replace a template
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(name.into(), source.into());
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<N: Into<String>, S: Into<String>> FromIterator<(N, S)> for EmbeddedSource {
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().map(|(n, s)| (n.into(), s.into())).collect(),
        }
    }
}

impl TemplateSource for EmbeddedSource {
    fn resolve(&self, name: &str) -> Result<Option<String>, CacheError> {
        Ok(self.templates.get(name).cloned())
    }

    fn names(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.templates.keys().cloned().collect())
    }

    fn describe(&self) -> String {
        format!("embedded ({} templates)", self.templates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_and_unknown() {
        let source = EmbeddedSource::new().with("greeting", "Hello, {{name}}!");

        assert_eq!(source.resolve("greeting").unwrap().as_deref(), Some("Hello, {{name}}!"));
        assert!(source.resolve("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_names_sorted() {
        let source: EmbeddedSource = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();

        assert_eq!(source.names().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn test_insert_replaces() {
        let mut source = EmbeddedSource::new();
        source.insert("t", "one");
        source.insert("t", "two");

        assert_eq!(source.resolve("t").unwrap().as_deref(), Some("two"));
        assert_eq!(source.len(), 1);
    }
}
