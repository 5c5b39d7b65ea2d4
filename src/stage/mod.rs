//! Uniform processing stage over blocking and non-blocking enrichers.
//!
//! A stage takes one document and produces exactly one result. Each call to
//! [`EnrichmentStage::process`] returns an [`Invocation`] that tells the
//! caller whether the result is already there (completed within the call) or
//! still pending, so schedulers can skip suspending for synchronous work.
//!
//! Per invocation:
//!
//! ```text
//! Started -> SyncCompleted | SyncFailed | Pending
//! Pending -> AsyncCompleted | AsyncFailed
//! ```

use crate::document::parsed::ParsedDocument;
use crate::enricher::{
    AsyncDocumentEnricher, Completion, DocumentEnricher, EnrichError, EnrichmentFailure,
    EnrichmentResult, PendingEnrichment,
};
use std::sync::Arc;

/// Lifecycle of a single stage invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageState {
    Started,
    SyncCompleted,
    SyncFailed,
    Pending,
    AsyncCompleted,
    AsyncFailed,
}

impl StageState {
    /// Returns true for states with no outgoing transition.
    pub fn is_terminal(self) -> bool {
        !matches!(self, StageState::Started | StageState::Pending)
    }

    /// Returns true if `next` may directly follow this state.
    pub fn can_transition_to(self, next: StageState) -> bool {
        use StageState::*;
        matches!(
            (self, next),
            (Started, SyncCompleted | SyncFailed | Pending) | (Pending, AsyncCompleted | AsyncFailed)
        )
    }

    /// The terminal state for a result that arrived after the call returned.
    pub fn after_pending(result: &EnrichmentResult) -> StageState {
        match result {
            Ok(_) => StageState::AsyncCompleted,
            Err(_) => StageState::AsyncFailed,
        }
    }
}

/// The outcome of one [`EnrichmentStage::process`] call.
#[derive(Debug)]
pub enum Invocation {
    /// The enricher finished within the call.
    Completed(EnrichmentResult),
    /// The enricher will report later.
    Pending(PendingEnrichment),
}

impl Invocation {
    pub fn state(&self) -> StageState {
        match self {
            Invocation::Completed(Ok(_)) => StageState::SyncCompleted,
            Invocation::Completed(Err(_)) => StageState::SyncFailed,
            Invocation::Pending(_) => StageState::Pending,
        }
    }

    pub fn completed_synchronously(&self) -> bool {
        matches!(self, Invocation::Completed(_))
    }

    /// Waits for the result, returning immediately if it is already known.
    pub async fn into_result(self) -> EnrichmentResult {
        match self {
            Invocation::Completed(result) => result,
            Invocation::Pending(pending) => {
                let result = pending.await;
                log_pending_outcome(&result);
                result
            }
        }
    }

    /// Blocking counterpart of [`into_result`](Self::into_result); not for
    /// use inside an async runtime.
    pub fn wait_blocking(self) -> EnrichmentResult {
        match self {
            Invocation::Completed(result) => result,
            Invocation::Pending(pending) => {
                let result = pending.blocking_wait();
                log_pending_outcome(&result);
                result
            }
        }
    }
}

fn log_pending_outcome(result: &EnrichmentResult) {
    let state = StageState::after_pending(result);
    match result {
        Ok(_) => tracing::debug!(?state, "enrichment stage finished"),
        Err(failure) => tracing::warn!(?state, error = %failure.cause, "enrichment stage failed"),
    }
}

/// A processing stage wrapping one enricher.
///
/// The enricher's shape is fixed when the stage is built.
#[derive(Clone)]
pub enum EnrichmentStage {
    Blocking(Arc<dyn DocumentEnricher>),
    NonBlocking(Arc<dyn AsyncDocumentEnricher>),
}

impl std::fmt::Debug for EnrichmentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichmentStage::Blocking(_) => f.write_str("EnrichmentStage::Blocking"),
            EnrichmentStage::NonBlocking(_) => f.write_str("EnrichmentStage::NonBlocking"),
        }
    }
}

impl EnrichmentStage {
    pub fn blocking(enricher: impl DocumentEnricher + 'static) -> Self {
        EnrichmentStage::Blocking(Arc::new(enricher))
    }

    pub fn non_blocking(enricher: impl AsyncDocumentEnricher + 'static) -> Self {
        EnrichmentStage::NonBlocking(Arc::new(enricher))
    }

    /// Runs the enricher on `input`.
    ///
    /// A missing input document fails synchronously with
    /// [`EnrichError::MissingDocument`].
    pub fn process(&self, input: Option<ParsedDocument>) -> Invocation {
        let Some(document) = input else {
            tracing::warn!(state = ?StageState::SyncFailed, "enrichment stage invoked without a document");
            return Invocation::Completed(Err(EnrichmentFailure::new(EnrichError::MissingDocument)));
        };
        tracing::trace!(
            state = ?StageState::Started,
            document = document.original_document().name(),
            "enrichment stage started"
        );

        let invocation = match self {
            EnrichmentStage::Blocking(enricher) => process_blocking(enricher.as_ref(), document),
            EnrichmentStage::NonBlocking(enricher) => {
                process_non_blocking(enricher.as_ref(), document)
            }
        };

        match &invocation {
            Invocation::Completed(Err(failure)) => tracing::warn!(
                state = ?invocation.state(),
                error = %failure.cause,
                "enrichment stage failed"
            ),
            _ => tracing::debug!(state = ?invocation.state(), "enrichment stage returned"),
        }
        invocation
    }
}

fn process_blocking(enricher: &dyn DocumentEnricher, mut document: ParsedDocument) -> Invocation {
    let result = match enricher.enrich_document(&mut document) {
        Ok(()) => Ok(document),
        Err(cause) => Err(EnrichmentFailure::with_document(cause, document)),
    };
    Invocation::Completed(result)
}

fn process_non_blocking(enricher: &dyn AsyncDocumentEnricher, document: ParsedDocument) -> Invocation {
    let (completion, mut pending) = Completion::channel();

    if let Err(cause) = enricher.enrich_document(document, completion.clone()) {
        if !completion.close() {
            tracing::error!("enricher signalled completion and also failed synchronously; completion discarded");
        }
        return Invocation::Completed(Err(EnrichmentFailure::new(cause)));
    }
    drop(completion);

    match pending.try_result() {
        Some(result) => Invocation::Completed(result),
        None => Invocation::Pending(pending),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        use StageState::*;
        assert!(Started.can_transition_to(SyncCompleted));
        assert!(Started.can_transition_to(SyncFailed));
        assert!(Started.can_transition_to(Pending));
        assert!(Pending.can_transition_to(AsyncCompleted));
        assert!(Pending.can_transition_to(AsyncFailed));

        assert!(!Started.can_transition_to(AsyncCompleted));
        assert!(!Pending.can_transition_to(SyncCompleted));
        assert!(!SyncCompleted.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!StageState::Started.is_terminal());
        assert!(!StageState::Pending.is_terminal());
        assert!(StageState::SyncCompleted.is_terminal());
        assert!(StageState::AsyncFailed.is_terminal());
    }

    #[test]
    fn test_missing_document_fails_synchronously() {
        let stage = EnrichmentStage::blocking(crate::enricher::NoopDocumentEnricher);
        let invocation = stage.process(None);
        assert_eq!(invocation.state(), StageState::SyncFailed);
        match invocation {
            Invocation::Completed(Err(failure)) => {
                assert!(matches!(failure.cause, EnrichError::MissingDocument))
            }
            other => panic!("unexpected invocation: {:?}", other),
        }
    }
}
