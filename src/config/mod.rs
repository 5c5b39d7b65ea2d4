//! Configuration for docs-enricher.
//!
//! Configuration is read from TOML. Every field has a default, so an empty
//! file (or no file at all) gives a pipeline that passes documents through
//! unchanged.
//!
//! # Example
//!
//! ```
//! use docs_enricher::config::Config;
//!
//! let config = Config::from_toml_str(
//!     r#"
//!     [dynamic]
//!     enrichable_properties_selectors = ["books[*]"]
//!     lookup_key_selectors = ["isbn"]
//!
//!     [dynamic.finder]
//!     file_path = "catalog"
//!     file_name_selector = "isbn"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.dynamic.lookup_key_selectors, vec!["isbn"]);
//! assert_eq!(config.output.indent_size, 2);
//! ```

use crate::enricher::{
    DynamicDocumentEnricher, EnrichError, NoopDocumentEnricher, StaticJsonDocumentEnricher,
};
use crate::finder::FileDocumentPropertiesFinder;
use crate::stage::EnrichmentStage;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Property files merged into every document.
    #[serde(default)]
    pub static_resources: StaticResourcesConfig,

    /// Selector-driven enrichment.
    #[serde(default)]
    pub dynamic: DynamicConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticResourcesConfig {
    /// JSON or YAML files, merged in order.
    #[serde(default)]
    pub paths: Vec<PathBuf>,

    /// Fail when a listed file does not exist instead of skipping it
    #[serde(default)]
    pub fail_on_missing_resource: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicConfig {
    /// Sections of the document to enrich; empty means the whole document.
    #[serde(default)]
    pub enrichable_properties_selectors: Vec<String>,

    /// Values extracted from each section and handed to the finder.
    #[serde(default)]
    pub lookup_key_selectors: Vec<String>,

    #[serde(default)]
    pub finder: Option<FinderConfig>,
}

impl DynamicConfig {
    fn is_configured(&self) -> bool {
        !self.enrichable_properties_selectors.is_empty()
            || !self.lookup_key_selectors.is_empty()
            || self.finder.is_some()
    }
}

/// Settings of the file-backed properties finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Static file, or parent folder of dynamic file names.
    #[serde(default)]
    pub file_path: Option<String>,

    #[serde(default)]
    pub file_name_selector: Option<String>,

    #[serde(default = "default_file_suffix")]
    pub file_suffix: Option<String>,

    #[serde(default)]
    pub property_selector: Option<String>,
}

fn default_file_suffix() -> Option<String> {
    Some(".json".to_string())
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            file_path: None,
            file_name_selector: None,
            file_suffix: default_file_suffix(),
            property_selector: None,
        }
    }
}

impl FinderConfig {
    /// Builds the finder, compiling its selectors.
    pub fn build(&self) -> Result<FileDocumentPropertiesFinder, EnrichError> {
        let finder = FileDocumentPropertiesFinder::default()
            .with_file_path(self.file_path.as_deref().unwrap_or_default())
            .with_file_suffix(self.file_suffix.as_deref().unwrap_or_default())
            .with_file_name_selector(self.file_name_selector.as_deref().unwrap_or_default())?
            .with_property_selector(self.property_selector.as_deref().unwrap_or_default())?;
        Ok(finder)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Copy an existing output file to `.bak` before overwriting it
    #[serde(default)]
    pub create_backup: bool,

    /// Spaces per indentation level in JSON output
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,
}

fn default_indent_size() -> usize {
    2
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            create_backup: false,
            indent_size: default_indent_size(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/docs-enricher/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("docs-enricher");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let Some(config_path) = Self::config_path() else {
            return Self::default();
        };

        if !config_path.exists() {
            return Self::default();
        }

        match Self::from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring unreadable config file");
                Self::default()
            }
        }
    }

    /// Loads configuration from an explicit file; errors are reported, not defaulted.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Builds the enrichment stages described by this configuration.
    ///
    /// Static resources run first, then dynamic enrichment. With neither
    /// configured a single pass-through stage is returned. Malformed
    /// selectors are reported here rather than at enrichment time.
    pub fn build_stages(&self) -> Result<Vec<EnrichmentStage>, EnrichError> {
        let mut stages = Vec::new();

        if !self.static_resources.paths.is_empty() {
            let enricher = StaticJsonDocumentEnricher::new(&self.static_resources.paths)
                .with_fail_on_missing_resource(self.static_resources.fail_on_missing_resource);
            stages.push(EnrichmentStage::blocking(enricher));
        }

        if self.dynamic.is_configured() {
            let mut enricher = DynamicDocumentEnricher::default()
                .with_enrichable_properties_selectors(&self.dynamic.enrichable_properties_selectors)?
                .with_lookup_key_selectors(&self.dynamic.lookup_key_selectors)?;
            if let Some(finder) = &self.dynamic.finder {
                enricher.set_properties_finder(Arc::new(finder.build()?));
            }
            stages.push(EnrichmentStage::blocking(enricher));
        }

        if stages.is_empty() {
            stages.push(EnrichmentStage::blocking(NoopDocumentEnricher));
        }

        tracing::debug!(stages = stages.len(), "built enrichment stages");
        Ok(stages)
    }
}
