//! Templates stored as files in a directory
//!
//! Template `NAME` lives at `ROOT/NAME.EXT`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::TemplateSource;
use crate::error::CacheError;

/// Default template file extension
pub const DEFAULT_EXTENSION: &str = "hbs";

/// Loads `{name}.{extension}` files from a root directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    /// Create a source over `root` using the default extension
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_extension(root, DEFAULT_EXTENSION)
    }

    /// Create a source over `root` with a custom extension (no leading dot)
    pub fn with_extension(root: impl AsRef<Path>, extension: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a template name maps to, rejecting names that would escape the root
    pub fn path_for(&self, name: &str) -> Result<PathBuf, CacheError> {
        let invalid = |reason: &str| CacheError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(invalid("contains a path separator"));
        }
        if name.contains("..") {
            return Err(invalid("contains '..'"));
        }

        Ok(self.root.join(format!("{}.{}", name, self.extension)))
    }
}

impl TemplateSource for DirectorySource {
    fn resolve(&self, name: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(?path, "Loading template from directory");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io { path, source: e }),
        }
    }

    fn names(&self) -> Result<Vec<String>, CacheError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CacheError::Io {
                    path: self.root.clone(),
                    source: e,
                });
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| CacheError::Io {
                    path: self.root.clone(),
                    source: e,
                })?
                .path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // Only list names that resolve would accept
            if self.path_for(stem).is_ok() {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn describe(&self) -> String {
        format!("directory {} (*.{})", self.root.display(), self.extension)
    }
}
