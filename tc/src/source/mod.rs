//! Template sources
//!
//! A [`TemplateSource`] resolves a template name to raw template markup.
//! The cache only ever talks to this trait, so markup can come from an
//! HTML document, a directory on disk, memory, or a layered combination.

mod directory;
mod document;
mod embedded;
mod layered;

pub use directory::{DEFAULT_EXTENSION, DirectorySource};
pub use document::{EMBER_SCRIPT_TYPE, HANDLEBARS_SCRIPT_TYPE, HtmlDocument, TemplateBlock};
pub use embedded::EmbeddedSource;
pub use layered::LayeredSource;

use crate::error::CacheError;

/// Resolves named templates to their raw markup
pub trait TemplateSource: Send + Sync {
    /// Look up the markup for `name`
    ///
    /// Returns `Ok(None)` when this source has no such template. `Err` is
    /// reserved for real access failures.
    fn resolve(&self, name: &str) -> Result<Option<String>, CacheError>;

    /// Names of every template this source can resolve
    fn names(&self) -> Result<Vec<String>, CacheError>;

    /// Short label used in logs and CLI output
    fn describe(&self) -> String;
}

impl<S: TemplateSource + ?Sized> TemplateSource for Box<S> {
    fn resolve(&self, name: &str) -> Result<Option<String>, CacheError> {
        (**self).resolve(name)
    }

    fn names(&self) -> Result<Vec<String>, CacheError> {
        (**self).names()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: TemplateSource + ?Sized> TemplateSource for std::sync::Arc<S> {
    fn resolve(&self, name: &str) -> Result<Option<String>, CacheError> {
        (**self).resolve(name)
    }

    fn names(&self) -> Result<Vec<String>, CacheError> {
        (**self).names()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
