use crate::document::parsed::ParsedDocument;
use crate::finder::FinderError;
use crate::selector::SelectorError;
use thiserror::Error;

/// Errors raised while configuring or running an enricher.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// A selector expression failed to compile.
    #[error(transparent)]
    MalformedSelector(#[from] SelectorError),

    /// The properties finder failed; the finder's error is passed through as is.
    #[error(transparent)]
    Finder(#[from] FinderError),

    /// The processing stage was invoked without a document.
    #[error("No document to enrich")]
    MissingDocument,

    /// A non-blocking enricher broke the completion contract.
    #[error("Enrichment protocol violation: {0}")]
    ProtocolViolation(String),

    /// A required static resource does not exist.
    #[error("Resource could not be loaded: {0}")]
    MissingResource(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A failed enrichment, with the document as it stood when the failure
/// happened when it is still available.
///
/// Sections merged before the failure stay merged; there is no rollback.
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct EnrichmentFailure {
    pub cause: EnrichError,
    pub document: Option<ParsedDocument>,
}

impl EnrichmentFailure {
    pub fn new(cause: EnrichError) -> Self {
        Self {
            cause,
            document: None,
        }
    }

    pub fn with_document(cause: EnrichError, document: ParsedDocument) -> Self {
        Self {
            cause,
            document: Some(document),
        }
    }
}

impl From<EnrichError> for EnrichmentFailure {
    fn from(cause: EnrichError) -> Self {
        EnrichmentFailure::new(cause)
    }
}

/// The outcome of one enrichment: the enriched document or the failure.
pub type EnrichmentResult = Result<ParsedDocument, EnrichmentFailure>;
