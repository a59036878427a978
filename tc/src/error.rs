//! Template cache error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, compiling or rendering a template
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Template not found: {name}")]
    NotFound { name: String },

    #[error("Failed to compile template {name}: {source}")]
    Compile {
        name: String,
        #[source]
        source: handlebars::TemplateError,
    },

    #[error("Failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: handlebars::RenderError,
    },

    #[error("Invalid template name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Template {name} cannot be embedded in a script block: {reason}")]
    InvalidBody { name: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// Check if this is a missing-template error
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }

    /// Check if this is a template syntax error
    pub fn is_compile(&self) -> bool {
        matches!(self, CacheError::Compile { .. })
    }

    /// Name of the template involved, when there is one
    pub fn template_name(&self) -> Option<&str> {
        match self {
            CacheError::NotFound { name }
            | CacheError::Compile { name, .. }
            | CacheError::Render { name, .. }
            | CacheError::InvalidName { name, .. }
            | CacheError::InvalidBody { name, .. } => Some(name),
            CacheError::Io { .. } => None,
        }
    }
}
