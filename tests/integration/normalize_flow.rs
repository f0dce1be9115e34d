use serde_json::json;

use jsonapi_admin::config::{CellContext, FormatterRegistry, display_value};
use jsonapi_admin::jsonapi::{ResolvedRelationship, ResourceIdentifier, normalize, normalize_value};
use jsonapi_admin::test_utils::{ConfigFixture, DocumentFixture, init_test_logging};

#[test]
fn test_books_page_resolves_included() {
    init_test_logging(None);
    let document = DocumentFixture::parse(&DocumentFixture::books_page());
    let normalized = normalize(&document, "Books");

    assert_eq!(normalized.records.len(), 2);
    let dune = &normalized.records[0];
    assert_eq!(dune.route, "Books");
    assert_eq!(dune.attribute("pages"), Some(&json!(412)));

    let author = dune.relationship("author").and_then(ResolvedRelationship::as_to_one).unwrap();
    assert!(author.is_resolved());
    assert_eq!(author.attribute("name"), Some(&json!("Frank Herbert")));

    assert_eq!(normalized.unresolved.len(), 1);
    assert_eq!(normalized.unresolved[0].record_id, "2");
    assert_eq!(normalized.unresolved[0].relationship, "tags");
    assert_eq!(normalized.unresolved[0].target, ResourceIdentifier::new("t2", "Tag"));
}

#[test]
fn test_flattened_records_serialize() {
    let normalized = normalize_value(&DocumentFixture::books_page(), "Books").unwrap();
    let serialized = serde_json::to_value(&normalized.records).unwrap();

    assert_eq!(serialized[1]["title"], "Children of Dune");
    assert_eq!(
        serialized[1]["tags"],
        json!([
            {"id": "t1", "type": "Tag", "attributes": {"label": "sf"}},
            {"id": "t2", "type": "Tag"}
        ])
    );
    assert_eq!(serialized[1]["relationships"]["author"]["id"], "9");
}

#[test]
fn test_table_rendering_with_formatters() {
    let config = ConfigFixture::resolved();
    let registry = FormatterRegistry::standard();
    let books = config.collection("Books").unwrap();
    let normalized = normalize_value(&DocumentFixture::books_page(), "Books").unwrap();

    let rows: Vec<Vec<String>> = normalized
        .records
        .iter()
        .map(|record| {
            books
                .columns
                .iter()
                .map(|column| {
                    registry.render_column(&CellContext {
                        record,
                        column,
                        config: &config,
                    })
                })
                .collect()
        })
        .collect();

    assert_eq!(rows[0], vec!["Dune", "Frank Herbert", "sf"]);
    // t2 was not side-loaded, so only the resolved tag renders
    assert_eq!(rows[1], vec!["Children of Dune", "Frank Herbert", "sf"]);
}

#[test]
fn test_display_value_of_unresolved_reference() {
    let config = ConfigFixture::resolved();
    let normalized = normalize_value(&DocumentFixture::single_book(), "Books").unwrap();
    let record = &normalized.records[0];

    assert_eq!(record.to_value()["author"], json!({"id": "9", "type": "Person"}));
    assert_eq!(display_value(record, "author", &config), None);
}
