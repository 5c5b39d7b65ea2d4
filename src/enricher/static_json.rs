//! Enricher merging static property files into every document.

use super::{DocumentEnricher, EnrichError};
use crate::document::merge::TreeMerge;
use crate::document::parsed::ParsedDocument;
use crate::file::loader::load_properties_file;
use std::path::{Path, PathBuf};

/// Merges the properties of one or more JSON/YAML files into each document.
///
/// Files are merged in the order given, with the usual merge rules: values
/// already in the document win. Missing files are skipped unless
/// `fail_on_missing_resource` is set.
#[derive(Debug, Clone, Default)]
pub struct StaticJsonDocumentEnricher {
    resource_paths: Vec<PathBuf>,
    fail_on_missing_resource: bool,
    tree_merge: TreeMerge,
}

impl StaticJsonDocumentEnricher {
    /// Creates an enricher for the given files; empty paths are ignored.
    pub fn new<I, P>(resource_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            resource_paths: resource_paths
                .into_iter()
                .map(|p| p.as_ref().to_path_buf())
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            ..Self::default()
        }
    }

    /// Fail enrichment when a resource does not exist (default: skip it).
    pub fn with_fail_on_missing_resource(mut self, fail_on_missing_resource: bool) -> Self {
        self.fail_on_missing_resource = fail_on_missing_resource;
        self
    }

    pub fn resource_paths(&self) -> &[PathBuf] {
        &self.resource_paths
    }
}

impl DocumentEnricher for StaticJsonDocumentEnricher {
    fn enrich_document(&self, document: &mut ParsedDocument) -> Result<(), EnrichError> {
        for path in &self.resource_paths {
            if !path.is_file() {
                if self.fail_on_missing_resource {
                    return Err(EnrichError::MissingResource(path.display().to_string()));
                }
                tracing::debug!(resource = %path.display(), "static resource not found, skipping");
                continue;
            }

            let additional_properties = load_properties_file(path)?;
            tracing::debug!(
                resource = %path.display(),
                properties = additional_properties.len(),
                "merging static resource"
            );
            self.tree_merge
                .merge_into(additional_properties, document.properties_mut());
        }

        Ok(())
    }
}
