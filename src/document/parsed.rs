//! Parsed documents: immutable source metadata plus a mutable properties tree.

use super::node::PropertyMap;
use std::fmt;
use std::sync::Arc;

/// The original document a property tree was extracted from.
///
/// Enrichment never inspects or modifies this; the content is reference
/// counted so cloning a `ParsedDocument` does not copy the payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    content: Arc<[u8]>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    /// Returns the original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the original raw bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// A document together with the properties extracted from it.
///
/// The `properties` root is the tree enrichers mutate in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    original_document: Document,
    properties: PropertyMap,
}

impl ParsedDocument {
    pub fn new(original_document: Document, properties: PropertyMap) -> Self {
        Self {
            original_document,
            properties,
        }
    }

    pub fn original_document(&self) -> &Document {
        &self.original_document
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }

    /// Consumes the document, returning the properties tree.
    pub fn into_properties(self) -> PropertyMap {
        self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::PropertyValue;

    #[test]
    fn test_properties_mutation_keeps_original_document() {
        let mut doc = ParsedDocument::new(
            Document::new("example.txt", b"hello world".to_vec()),
            PropertyMap::new(),
        );
        doc.properties_mut()
            .insert("name".to_string(), PropertyValue::from("example"));

        assert_eq!(doc.original_document().name(), "example.txt");
        assert_eq!(doc.original_document().content(), b"hello world");
        assert_eq!(doc.properties().len(), 1);
    }

    #[test]
    fn test_debug_hides_payload() {
        let doc = Document::new("a.bin", vec![0u8; 4]);
        assert_eq!(format!("{:?}", doc), r#"Document { name: "a.bin", content_len: 4 }"#);
    }
}
