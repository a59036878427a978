//! Layered template lookup
//!
//! Checks each layer in order and returns the first hit, e.g. a user
//! override directory, then the project templates, then embedded defaults.

use std::collections::BTreeSet;

use tracing::debug;

use super::TemplateSource;
use crate::error::CacheError;

/// Ordered stack of sources; earlier layers shadow later ones
#[derive(Default)]
pub struct LayeredSource {
    layers: Vec<Box<dyn TemplateSource>>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lower-priority layer, builder style
    pub fn with_layer(mut self, layer: impl TemplateSource + 'static) -> Self {
        self.push(layer);
        self
    }

    /// Append a lower-priority layer
    pub fn push(&mut self, layer: impl TemplateSource + 'static) {
        self.layers.push(Box::new(layer));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl TemplateSource for LayeredSource {
    fn resolve(&self, name: &str) -> Result<Option<String>, CacheError> {
        for layer in &self.layers {
            if let Some(content) = layer.resolve(name)? {
                debug!(%name, layer = %layer.describe(), "Resolved template");
                return Ok(Some(content));
            }
        }
        Ok(None)
    }

    fn names(&self) -> Result<Vec<String>, CacheError> {
        let mut names = BTreeSet::new();
        for layer in &self.layers {
            names.extend(layer.names()?);
        }
        Ok(names.into_iter().collect())
    }

    fn describe(&self) -> String {
        let layers: Vec<String> = self.layers.iter().map(|l| l.describe()).collect();
        format!("layered [{}]", layers.join(", "))
    }
}

impl std::fmt::Debug for LayeredSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredSource").field("layers", &self.describe()).finish()
    }
}
