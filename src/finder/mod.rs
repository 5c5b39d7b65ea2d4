//! Properties finders: the lookup side of dynamic enrichment.
//!
//! A finder receives the lookup keys extracted from one document section (a
//! map from concrete selector path to value) and returns additional
//! properties to merge into that section. Backends plug in by implementing
//! [`DocumentPropertiesFinder`].

pub mod error;
pub mod file;

pub use error::FinderError;
pub use file::{FileDocumentPropertiesFinder, FileSystemSource, PropertiesSource};

use crate::document::node::PropertyMap;

/// Finds additional document properties from a set of lookup key/value pairs.
///
/// Implementations return an empty map when nothing matches; errors are
/// reserved for failed lookups (I/O, query or decoding failures). Finders
/// own their internal synchronisation; one instance may be called from
/// several enrichments at once.
pub trait DocumentPropertiesFinder: Send + Sync {
    fn find_properties(&self, lookup_keys: &PropertyMap) -> Result<PropertyMap, FinderError>;
}

impl<F> DocumentPropertiesFinder for F
where
    F: Fn(&PropertyMap) -> Result<PropertyMap, FinderError> + Send + Sync,
{
    fn find_properties(&self, lookup_keys: &PropertyMap) -> Result<PropertyMap, FinderError> {
        self(lookup_keys)
    }
}
