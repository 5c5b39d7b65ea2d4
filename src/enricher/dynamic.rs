//! Dynamic enrichment driven by values already present in the document.
//!
//! The enrichable-properties selectors pick the sections of the document to
//! enrich. Each selected value must be a mapping; with no selectors the
//! document's root properties form the only section.
//!
//! For every section the lookup-key selectors extract key/value pairs, the
//! properties finder turns those into additional properties, and the result
//! is merged into the section. Sections are processed in order; a finder
//! failure stops the run, leaving earlier sections merged.

use super::error::{EnrichError, EnrichmentFailure};
use super::DocumentEnricher;
use crate::document::merge::TreeMerge;
use crate::document::node::{PropertyMap, PropertyValue, ValueKind};
use crate::document::parsed::ParsedDocument;
use crate::finder::{DocumentPropertiesFinder, FinderError};
use crate::selector::{select_all, Selector, SelectorError};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct DynamicDocumentEnricher {
    tree_merge: TreeMerge,
    enrichable_properties_selectors: Vec<Selector>,
    lookup_key_selectors: Vec<Selector>,
    properties_finder: Option<Arc<dyn DocumentPropertiesFinder>>,
}

impl std::fmt::Debug for DynamicDocumentEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicDocumentEnricher")
            .field("enrichable_properties_selectors", &self.enrichable_properties_selectors)
            .field("lookup_key_selectors", &self.lookup_key_selectors)
            .field("has_properties_finder", &self.properties_finder.is_some())
            .finish()
    }
}

/// Compiles expressions in order, dropping repeats.
fn compile_selectors<I, S>(expressions: I) -> Result<Vec<Selector>, SelectorError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut selectors: Vec<Selector> = Vec::new();
    for expression in expressions {
        let selector = Selector::parse(expression.as_ref())?;
        if !selectors.contains(&selector) {
            selectors.push(selector);
        }
    }
    Ok(selectors)
}

impl DynamicDocumentEnricher {
    pub fn new(properties_finder: Arc<dyn DocumentPropertiesFinder>) -> Self {
        Self {
            properties_finder: Some(properties_finder),
            ..Self::default()
        }
    }

    pub fn set_properties_finder(&mut self, properties_finder: Arc<dyn DocumentPropertiesFinder>) {
        self.properties_finder = Some(properties_finder);
    }

    /// Replaces the selectors choosing which sections get enriched.
    ///
    /// Fails without changing the enricher if any expression is malformed.
    pub fn set_enrichable_properties_selectors<I, S>(
        &mut self,
        expressions: I,
    ) -> Result<(), SelectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.enrichable_properties_selectors = compile_selectors(expressions)?;
        Ok(())
    }

    /// Replaces the selectors extracting lookup keys from each section.
    pub fn set_lookup_key_selectors<I, S>(&mut self, expressions: I) -> Result<(), SelectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lookup_key_selectors = compile_selectors(expressions)?;
        Ok(())
    }

    pub fn with_enrichable_properties_selectors<I, S>(
        mut self,
        expressions: I,
    ) -> Result<Self, SelectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_enrichable_properties_selectors(expressions)?;
        Ok(self)
    }

    pub fn with_lookup_key_selectors<I, S>(mut self, expressions: I) -> Result<Self, SelectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_lookup_key_selectors(expressions)?;
        Ok(self)
    }

    pub fn enrichable_properties_selectors(&self) -> &[Selector] {
        &self.enrichable_properties_selectors
    }

    pub fn lookup_key_selectors(&self) -> &[Selector] {
        &self.lookup_key_selectors
    }

    /// Enriches an optional document; an absent document is returned as is.
    ///
    /// On failure the partially enriched document travels with the error.
    pub fn enrich_optional(
        &self,
        document: Option<ParsedDocument>,
    ) -> Result<Option<ParsedDocument>, EnrichmentFailure> {
        let Some(mut document) = document else {
            return Ok(None);
        };

        match self.enrich_document(&mut document) {
            Ok(()) => Ok(Some(document)),
            Err(cause) => Err(EnrichmentFailure::with_document(cause, document)),
        }
    }

    /// Resolves the sections to enrich: `None` is the root properties map,
    /// `Some(path)` a concrete path to a mapping.
    fn enrichable_sections(&self, properties: &PropertyMap) -> Vec<Option<Selector>> {
        if self.enrichable_properties_selectors.is_empty() {
            return vec![None];
        }

        self.enrichable_properties_selectors
            .iter()
            .flat_map(|selector| selector.resolve(properties))
            .filter(|resolved| resolved.value.kind() == ValueKind::Object)
            .map(|resolved| Some(resolved.path))
            .collect()
    }

    fn find_additional_properties(
        &self,
        lookup_keys: &PropertyMap,
    ) -> Result<PropertyMap, FinderError> {
        match &self.properties_finder {
            Some(finder) => finder.find_properties(lookup_keys),
            None => Ok(PropertyMap::new()),
        }
    }
}

fn section_mut<'a>(
    properties: &'a mut PropertyMap,
    section: Option<&Selector>,
) -> Option<&'a mut PropertyMap> {
    match section {
        None => Some(properties),
        Some(path) => match path.select_value_mut(properties) {
            Some(PropertyValue::Object(map)) => Some(map),
            _ => None,
        },
    }
}

impl DocumentEnricher for DynamicDocumentEnricher {
    fn enrich_document(&self, document: &mut ParsedDocument) -> Result<(), EnrichError> {
        let sections = self.enrichable_sections(document.properties());
        tracing::debug!(
            document = document.original_document().name(),
            sections = sections.len(),
            "enriching document"
        );

        for section in &sections {
            let Some(properties) = section_mut(document.properties_mut(), section.as_ref()) else {
                continue;
            };
            let section_name = section.as_ref().map_or("<root>", Selector::as_str);

            let lookup_keys = select_all(&self.lookup_key_selectors, properties);
            let additional_properties =
                self.find_additional_properties(&lookup_keys)
                    .map_err(|err| {
                        tracing::warn!(section = section_name, error = %err, "properties lookup failed");
                        err
                    })?;

            tracing::debug!(
                section = section_name,
                lookup_keys = lookup_keys.len(),
                additional_properties = additional_properties.len(),
                "merging additional properties"
            );
            if !additional_properties.is_empty() {
                self.tree_merge.merge_into(additional_properties, properties);
            }
        }

        Ok(())
    }
}
