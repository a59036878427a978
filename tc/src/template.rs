//! Compiled template handle
//!
//! Wraps a template compiled by the handlebars engine together with the
//! registry it renders through.

use handlebars::{Handlebars, Template};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CacheError;

/// Options applied to every template a cache compiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Referencing a missing field is a render error
    pub strict: bool,

    /// HTML-escape the output of `{{expr}}`
    #[serde(rename = "escape-html")]
    pub escape_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            strict: false,
            escape_html: true,
        }
    }
}

/// A template compiled once and rendered any number of times
pub struct CompiledTemplate {
    name: String,
    source: String,
    hbs: Handlebars<'static>,
}

impl CompiledTemplate {
    /// Compile template source under the given name
    pub fn compile(name: &str, source: &str, options: RenderOptions) -> Result<Self, CacheError> {
        debug!(%name, source_len = source.len(), "CompiledTemplate::compile: called");
        let template = Template::compile(source).map_err(|e| CacheError::Compile {
            name: name.to_string(),
            source: e,
        })?;

        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(options.strict);
        if !options.escape_html {
            hbs.register_escape_fn(handlebars::no_escape);
        }
        hbs.register_template(name, template);

        Ok(Self {
            name: name.to_string(),
            source: source.to_string(),
            hbs,
        })
    }

    /// Render the template with the given data context
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, CacheError> {
        self.hbs.render(&self.name, data).map_err(|e| CacheError::Render {
            name: self.name.clone(),
            source: e,
        })
    }

    /// The name this template was compiled under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw source the template was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("name", &self.name)
            .field("source_len", &self.source.len())
            .finish()
    }
}
