//! templatecache configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::TemplateCache;
use crate::markup::ScriptStyle;
use crate::source::{DEFAULT_EXTENSION, DirectorySource, HtmlDocument, LayeredSource, TemplateSource};
use crate::template::RenderOptions;

/// Project-local config file, looked up in the working directory
pub const LOCAL_CONFIG: &str = ".templatecache.yml";

/// Main templatecache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where templates are looked up
    pub sources: SourcesConfig,

    /// Options applied when compiling templates
    pub render: RenderOptions,

    /// Script block emission
    pub markup: MarkupConfig,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// An explicit path must load. Otherwise the first readable file among
    /// [`Config::candidate_paths`] wins, and defaults apply when none does.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        Ok(Self::load_first(&Self::candidate_paths()).unwrap_or_else(|| {
            tracing::info!("No config file found, using defaults");
            Self::default()
        }))
    }

    /// Implicit config locations, most specific first
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("templatecache").join("templatecache.yml"));
        }
        paths
    }

    /// First candidate that exists and parses; broken files are skipped
    fn load_first(candidates: &[PathBuf]) -> Option<Self> {
        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::load_from_file(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                    None
                }
            })
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Replace the configured sources with explicit paths, split by kind
    pub fn override_sources(&mut self, paths: &[PathBuf]) {
        let (dir_paths, doc_paths): (Vec<&PathBuf>, Vec<&PathBuf>) = paths.iter().partition(|p| p.is_dir());
        self.sources.directories = dir_paths.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        self.sources.documents = doc_paths.iter().map(|p| p.to_string_lossy().into_owned()).collect();
    }

    /// Build the layered source: directories first, then documents, in listed order
    pub fn build_source(&self) -> Result<LayeredSource> {
        let mut source = LayeredSource::new();

        for dir in self.sources.expanded_directories() {
            if !dir.is_dir() {
                // Kept as a layer: it lists nothing until the directory appears
                tracing::debug!(?dir, "Template directory does not exist");
            }
            source.push(DirectorySource::with_extension(&dir, &self.sources.extension));
        }
        for doc in self.sources.expanded_documents() {
            let document =
                HtmlDocument::load(&doc).context(format!("Failed to load template document {}", doc.display()))?;
            tracing::debug!(?doc, blocks = document.blocks().len(), "Added document layer");
            source.push(document);
        }

        if source.is_empty() {
            tracing::warn!("No template sources configured");
        } else {
            tracing::info!(layers = source.len(), "Built template source: {}", source.describe());
        }
        Ok(source)
    }

    /// Build a cache over the configured sources
    pub fn build_cache(&self) -> Result<TemplateCache<LayeredSource>> {
        Ok(TemplateCache::with_options(self.build_source()?, self.render))
    }
}

/// Template source locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Directories holding one template per file
    pub directories: Vec<String>,

    /// HTML documents holding template script blocks
    pub documents: Vec<String>,

    /// Template file extension within directories
    pub extension: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            directories: vec!["templates".to_string()],
            documents: Vec::new(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl SourcesConfig {
    pub fn expanded_directories(&self) -> Vec<PathBuf> {
        self.directories.iter().filter_map(|p| expand_path(p)).collect()
    }

    pub fn expanded_documents(&self) -> Vec<PathBuf> {
        self.documents.iter().filter_map(|p| expand_path(p)).collect()
    }
}

/// Script block emission configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Emit `data-template-name` blocks instead of `id` blocks
    #[serde(rename = "ember-style")]
    pub ember_style: bool,
}

impl MarkupConfig {
    pub fn style(&self) -> ScriptStyle {
        if self.ember_style {
            ScriptStyle::Ember
        } else {
            ScriptStyle::Standard
        }
    }
}

/// Resolve `~/` against the home directory
fn expand_path(p: &str) -> Option<PathBuf> {
    if let Some(rest) = p.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(rest))
    } else {
        Some(PathBuf::from(p))
    }
}
