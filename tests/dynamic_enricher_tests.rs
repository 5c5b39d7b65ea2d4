//! Integration tests for the dynamic enrichment orchestrator.

use docs_enricher::document::node::{PropertyMap, PropertyValue};
use docs_enricher::document::parsed::{Document, ParsedDocument};
use docs_enricher::enricher::{DocumentEnricher, DynamicDocumentEnricher, EnrichError};
use docs_enricher::finder::{DocumentPropertiesFinder, FinderError};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn props(value: serde_json::Value) -> PropertyMap {
    serde_json::from_value(value).unwrap()
}

fn create_document() -> ParsedDocument {
    ParsedDocument::new(
        Document::new("example.txt", b"hello world".to_vec()),
        props(json!({
            "name": "example",
            "id": "12",
            "authors": [{"id": "2"}, {"id": "5"}],
            "versions": [10, 22, 31]
        })),
    )
}

type Calls = Arc<Mutex<Vec<PropertyMap>>>;

/// A finder recording every lookup and answering from `respond`.
fn recording_finder<F>(respond: F) -> (Arc<dyn DocumentPropertiesFinder>, Calls)
where
    F: Fn(&PropertyMap) -> Result<PropertyMap, FinderError> + Send + Sync + 'static,
{
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let finder = move |keys: &PropertyMap| -> Result<PropertyMap, FinderError> {
        recorded.lock().unwrap().push(keys.clone());
        respond(keys)
    };
    let finder: Arc<dyn DocumentPropertiesFinder> = Arc::new(finder);
    (finder, calls)
}

/// Looks authors up by id.
fn author_directory(keys: &PropertyMap) -> Result<PropertyMap, FinderError> {
    let name = match keys.get("id").and_then(|id| id.as_str()) {
        Some("2") => "John Smith",
        Some("5") => "Peter Jones",
        Some("9") => return Err(FinderError::Lookup("author 9 is unavailable".to_string())),
        _ => return Ok(PropertyMap::new()),
    };
    Ok(props(json!({ "name": name })))
}

#[test]
fn test_key_selectors() {
    let (finder, calls) = recording_finder(|_| Ok(PropertyMap::new()));
    let mut enricher = DynamicDocumentEnricher::new(finder);

    enricher.set_lookup_key_selectors(["authors[0]"]).unwrap();
    enricher.enrich_document(&mut create_document()).unwrap();
    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &[props(json!({"authors[0]": {"id": "2"}}))]
    );

    calls.lock().unwrap().clear();
    enricher.set_lookup_key_selectors(["authors[*]"]).unwrap();
    enricher.enrich_document(&mut create_document()).unwrap();
    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &[props(json!({"authors[0]": {"id": "2"}, "authors[1]": {"id": "5"}}))]
    );
}

#[test]
fn test_property_selectors() {
    let (finder, calls) = recording_finder(author_directory);
    let enricher = DynamicDocumentEnricher::new(finder)
        .with_lookup_key_selectors(["id"])
        .unwrap()
        .with_enrichable_properties_selectors(["authors[*]"])
        .unwrap();

    let mut document = create_document();
    enricher.enrich_document(&mut document).unwrap();

    assert_eq!(
        document.properties()["authors"],
        serde_json::from_value::<PropertyValue>(json!([
            {"id": "2", "name": "John Smith"},
            {"id": "5", "name": "Peter Jones"}
        ]))
        .unwrap()
    );

    // each section sees only its own keys
    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &[props(json!({"id": "2"})), props(json!({"id": "5"}))]
    );
}

#[test]
fn test_whole_document_is_the_default_section() {
    let (finder, calls) = recording_finder(|_| Ok(props(json!({"name": "ignored", "status": "final"}))));
    let enricher = DynamicDocumentEnricher::new(finder);

    let mut document = create_document();
    enricher.enrich_document(&mut document).unwrap();

    // no lookup selectors: one call with no keys
    assert_eq!(calls.lock().unwrap().as_slice(), &[PropertyMap::new()]);
    assert_eq!(document.properties()["name"].as_str(), Some("example"));
    assert_eq!(document.properties()["status"].as_str(), Some("final"));
}

#[test]
fn test_non_mapping_sections_are_skipped() {
    let (finder, calls) = recording_finder(|_| Ok(props(json!({"x": 1}))));
    let enricher = DynamicDocumentEnricher::new(finder)
        .with_enrichable_properties_selectors(["versions[*]", "name", "missing"])
        .unwrap();

    let mut document = create_document();
    enricher.enrich_document(&mut document).unwrap();

    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(document.properties(), create_document().properties());
}

#[test]
fn test_finder_failure_aborts_and_keeps_earlier_sections() {
    let (finder, calls) = recording_finder(author_directory);
    let enricher = DynamicDocumentEnricher::new(finder)
        .with_lookup_key_selectors(["id"])
        .unwrap()
        .with_enrichable_properties_selectors(["authors[*]"])
        .unwrap();

    let document = ParsedDocument::new(
        Document::new("example.txt", b"hello world".to_vec()),
        props(json!({"authors": [{"id": "2"}, {"id": "9"}, {"id": "5"}]})),
    );

    let failure = enricher.enrich_optional(Some(document)).unwrap_err();
    match &failure.cause {
        EnrichError::Finder(FinderError::Lookup(message)) => {
            assert_eq!(message, "author 9 is unavailable")
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let partial = failure.document.expect("partially enriched document");
    assert_eq!(
        partial.properties(),
        &props(json!({
            "authors": [{"id": "2", "name": "John Smith"}, {"id": "9"}, {"id": "5"}]
        }))
    );
    // the third section is never looked up
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[test]
fn test_finder_error_message_is_passed_through() {
    let (finder, _calls) = recording_finder(author_directory);
    let enricher = DynamicDocumentEnricher::new(finder)
        .with_lookup_key_selectors(["id"])
        .unwrap();

    let mut document = ParsedDocument::new(
        Document::new("example.txt", Vec::new()),
        props(json!({"id": "9"})),
    );
    let err = enricher.enrich_document(&mut document).unwrap_err();
    assert_eq!(err.to_string(), FinderError::Lookup("author 9 is unavailable".to_string()).to_string());
}

#[test]
fn test_without_finder_document_is_unchanged() {
    let enricher = DynamicDocumentEnricher::default()
        .with_lookup_key_selectors(["id"])
        .unwrap();

    let mut document = create_document();
    enricher.enrich_document(&mut document).unwrap();
    assert_eq!(document, create_document());
}

#[test]
fn test_absent_document_is_returned_unchanged() {
    let (finder, calls) = recording_finder(author_directory);
    let enricher = DynamicDocumentEnricher::new(finder);

    assert!(enricher.enrich_optional(None).unwrap().is_none());
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_existing_values_win_and_sequences_accumulate() {
    let (finder, _calls) = recording_finder(|_| {
        Ok(props(json!({"name": "replacement", "versions": [40], "summary": {"pages": 3}})))
    });
    let enricher = DynamicDocumentEnricher::new(finder);

    let mut document = create_document();
    enricher.enrich_document(&mut document).unwrap();

    let properties = document.properties();
    assert_eq!(properties["name"].as_str(), Some("example"));
    assert_eq!(properties["versions"].as_array().map(Vec::len), Some(4));
    assert!(properties["summary"].is_object());
}

#[test]
fn test_malformed_selector_leaves_configuration_unchanged() {
    let mut enricher = DynamicDocumentEnricher::default()
        .with_lookup_key_selectors(["id"])
        .unwrap();

    let err = enricher.set_lookup_key_selectors(["name", "authors[x]"]).unwrap_err();
    assert!(err.to_string().contains("authors[x]"));
    let configured: Vec<&str> = enricher.lookup_key_selectors().iter().map(|s| s.as_str()).collect();
    assert_eq!(configured, vec!["id"]);
}

#[test]
fn test_duplicate_selectors_are_collapsed() {
    let enricher = DynamicDocumentEnricher::default()
        .with_enrichable_properties_selectors(["authors[*]", "authors[*]", "meta"])
        .unwrap();
    assert_eq!(enricher.enrichable_properties_selectors().len(), 2);
}

#[test]
fn test_enricher_is_shareable_across_threads() {
    let (finder, calls) = recording_finder(author_directory);
    let enricher = Arc::new(
        DynamicDocumentEnricher::new(finder)
            .with_lookup_key_selectors(["id"])
            .unwrap()
            .with_enrichable_properties_selectors(["authors[*]"])
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let enricher = Arc::clone(&enricher);
            std::thread::spawn(move || {
                let mut document = create_document();
                enricher.enrich_document(&mut document).unwrap();
                document
            })
        })
        .collect();

    for handle in handles {
        let document = handle.join().unwrap();
        assert_eq!(
            document.properties()["authors"].as_array().unwrap()[1]
                .as_object()
                .unwrap()["name"]
                .as_str(),
            Some("Peter Jones")
        );
    }
    assert_eq!(calls.lock().unwrap().len(), 8);
}
