//! Document enrichers.
//!
//! Two shapes of enricher exist:
//!
//! - [`DocumentEnricher`] enriches a document in place and returns when done.
//! - [`AsyncDocumentEnricher`] starts enrichment and reports the result later
//!   through a [`Completion`], exactly once.
//!
//! [`crate::stage::EnrichmentStage`] adapts either shape to a single
//! one-request/one-result processing contract.

pub mod completion;
pub mod dynamic;
pub mod error;
pub mod noop;
pub mod static_json;

pub use completion::{Completion, PendingEnrichment};
pub use dynamic::DynamicDocumentEnricher;
pub use error::{EnrichError, EnrichmentFailure, EnrichmentResult};
pub use noop::NoopDocumentEnricher;
pub use static_json::StaticJsonDocumentEnricher;

use crate::document::parsed::ParsedDocument;

/// Enriches a document with additional properties, blocking the caller.
///
/// The document is mutated in place. On error the document keeps whatever
/// was merged before the failure.
///
/// If enrichment may block for a significant time, consider implementing
/// [`AsyncDocumentEnricher`] instead.
pub trait DocumentEnricher: Send + Sync {
    fn enrich_document(&self, document: &mut ParsedDocument) -> Result<(), EnrichError>;
}

/// Enriches a document without blocking the caller.
pub trait AsyncDocumentEnricher: Send + Sync {
    /// Starts enriching `document`.
    ///
    /// Must signal `completion` exactly once, now or later and from any
    /// thread, with the enriched document or the failure. An `Err` return
    /// means the initial synchronous part failed; the completion must then
    /// not be signalled.
    fn enrich_document(
        &self,
        document: ParsedDocument,
        completion: Completion,
    ) -> Result<(), EnrichError>;
}
