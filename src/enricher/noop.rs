use super::{DocumentEnricher, EnrichError};
use crate::document::parsed::ParsedDocument;

/// A pass-through enricher: the document is returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDocumentEnricher;

impl DocumentEnricher for NoopDocumentEnricher {
    fn enrich_document(&self, _document: &mut ParsedDocument) -> Result<(), EnrichError> {
        Ok(())
    }
}
