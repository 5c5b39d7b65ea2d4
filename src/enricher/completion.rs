//! Exactly-once completion for non-blocking enrichers.
//!
//! A [`Completion`] is the callback side handed to an
//! [`AsyncDocumentEnricher`](super::AsyncDocumentEnricher); the matching
//! [`PendingEnrichment`] is the caller side that resolves once the enricher
//! reports its result.
//!
//! The first signal wins. Any later `succeed`/`fail` on the same completion
//! (or a clone of it) is rejected with [`EnrichError::ProtocolViolation`] and
//! logged. Dropping every handle without signalling resolves the pending side
//! with a protocol violation as well.

use super::error::{EnrichError, EnrichmentFailure, EnrichmentResult};
use crate::document::parsed::ParsedDocument;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::oneshot;

type Sender = oneshot::Sender<EnrichmentResult>;

/// Callback handle for reporting the result of a non-blocking enrichment.
///
/// Cloning shares the same slot; only one signal is accepted across all clones.
#[derive(Clone)]
pub struct Completion {
    sender: Arc<Mutex<Option<Sender>>>,
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("done", &self.is_done())
            .finish()
    }
}

impl Completion {
    /// Creates a connected completion / pending pair.
    pub fn channel() -> (Completion, PendingEnrichment) {
        let (sender, receiver) = oneshot::channel();
        let completion = Completion {
            sender: Arc::new(Mutex::new(Some(sender))),
        };
        (completion, PendingEnrichment { receiver })
    }

    /// Reports the enriched document.
    pub fn succeed(&self, document: ParsedDocument) -> Result<(), EnrichError> {
        self.complete(Ok(document))
    }

    /// Reports a failure without a document.
    pub fn fail(&self, cause: EnrichError) -> Result<(), EnrichError> {
        self.complete(Err(EnrichmentFailure::new(cause)))
    }

    /// Reports a failure together with the partially enriched document.
    pub fn fail_with_document(
        &self,
        document: ParsedDocument,
        cause: EnrichError,
    ) -> Result<(), EnrichError> {
        self.complete(Err(EnrichmentFailure::with_document(cause, document)))
    }

    /// Returns true once a result has been signalled or the completion was closed.
    pub fn is_done(&self) -> bool {
        self.lock().is_none()
    }

    /// Stops accepting results. Returns false if a result had already been
    /// signalled (or the completion was already closed).
    pub(crate) fn close(&self) -> bool {
        self.lock().take().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Sender>> {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, result: EnrichmentResult) -> Result<(), EnrichError> {
        let Some(sender) = self.lock().take() else {
            tracing::error!("enrichment completion signalled more than once");
            return Err(EnrichError::ProtocolViolation(
                "completion signalled more than once".to_string(),
            ));
        };

        if sender.send(result).is_err() {
            tracing::debug!("enrichment result discarded: caller is no longer waiting");
        }
        Ok(())
    }
}

/// The caller's side of a non-blocking enrichment.
///
/// Resolves to the signalled result. Awaiting it requires a tokio runtime
/// only in the sense of any future; [`blocking_wait`](Self::blocking_wait)
/// serves callers outside async code.
#[derive(Debug)]
pub struct PendingEnrichment {
    receiver: oneshot::Receiver<EnrichmentResult>,
}

fn dropped_without_result() -> EnrichmentFailure {
    EnrichmentFailure::new(EnrichError::ProtocolViolation(
        "completion dropped without a result".to_string(),
    ))
}

impl PendingEnrichment {
    /// Returns the result if it has already been signalled.
    pub fn try_result(&mut self) -> Option<EnrichmentResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(dropped_without_result())),
        }
    }

    /// Blocks the current thread until the result arrives.
    ///
    /// Must not be called from within an async runtime.
    pub fn blocking_wait(self) -> EnrichmentResult {
        self.receiver
            .blocking_recv()
            .unwrap_or_else(|_| Err(dropped_without_result()))
    }
}

impl Future for PendingEnrichment {
    type Output = EnrichmentResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(dropped_without_result())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::PropertyMap;
    use crate::document::parsed::Document;

    fn document() -> ParsedDocument {
        ParsedDocument::new(Document::new("a.txt", b"a".to_vec()), PropertyMap::new())
    }

    #[test]
    fn test_first_signal_wins() {
        let (completion, mut pending) = Completion::channel();
        assert!(pending.try_result().is_none());

        completion.succeed(document()).unwrap();
        assert!(completion.is_done());

        let second = completion.fail(EnrichError::MissingDocument);
        assert!(matches!(second, Err(EnrichError::ProtocolViolation(_))));

        let result = pending.try_result().unwrap();
        assert_eq!(result.unwrap().original_document().name(), "a.txt");
    }

    #[test]
    fn test_clones_share_one_slot() {
        let (completion, pending) = Completion::channel();
        let other = completion.clone();

        other.fail(EnrichError::MissingDocument).unwrap();
        assert!(completion.succeed(document()).is_err());

        let failure = pending.blocking_wait().unwrap_err();
        assert!(matches!(failure.cause, EnrichError::MissingDocument));
    }

    #[test]
    fn test_dropped_completion_is_a_protocol_violation() {
        let (completion, mut pending) = Completion::channel();
        drop(completion);

        let failure = pending.try_result().unwrap().unwrap_err();
        assert!(matches!(failure.cause, EnrichError::ProtocolViolation(_)));
    }

    #[test]
    fn test_closed_completion_rejects_results() {
        let (completion, _pending) = Completion::channel();
        assert!(completion.close());
        assert!(!completion.close());
        assert!(completion.succeed(document()).is_err());
    }
}
