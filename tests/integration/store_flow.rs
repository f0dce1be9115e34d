use serde_json::{Map, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use jsonapi_admin::core::AdminError;
use jsonapi_admin::jsonapi::{Document, ResourceIdentifier};
use jsonapi_admin::request::{HttpMethod, RelationshipUpdate, RequestPlan};
use jsonapi_admin::store::{ApplyOutcome, CollectionStore, ListPage};
use jsonapi_admin::test_utils::{ConfigFixture, DocumentFixture};

fn page(ids: &[&str], count: i64) -> Document {
    let data: Vec<_> = ids.iter().map(|id| json!({"id": id, "type": "Book", "attributes": {"title": id}})).collect();
    Document::from_value(&json!({"data": data, "meta": {"count": count}})).unwrap()
}

#[test]
fn test_list_then_item_lifecycle() {
    let config = ConfigFixture::resolved();
    let mut store = CollectionStore::from_config(&config);
    assert_eq!(store.get("People").unwrap().limit, 10);

    let mut filter = Map::new();
    filter.insert("genre".to_string(), json!("sf"));
    store.set_filter("Books", filter).unwrap();
    store.set_search("Books", "dune").unwrap();

    let ticket = store.begin_fetch("Books").unwrap();
    let document = DocumentFixture::parse(&DocumentFixture::books_page());
    let outcome = store.apply_list_document(&ticket, 0, 25, &document).unwrap();
    assert_eq!(outcome, ApplyOutcome::Applied);

    let books = store.get("Books").unwrap();
    assert_eq!(books.count, 42);
    assert_eq!(books.data.len(), 2);
    assert_eq!(books.search, "dune");
    assert_eq!(books.filter["genre"], "sf");

    // An item fetch for a cached id leaves the list row alone
    let refetched = DocumentFixture::parse(&json!({
        "data": {"id": "1", "type": "Book", "attributes": {"title": "Dune (revised)"}}
    }));
    assert_eq!(store.apply_item_document("Books", &refetched).unwrap(), 0);
    assert_eq!(store.get_item("Books", "1").unwrap().unwrap().attribute("title"), Some(&json!("Dune")));

    let single = DocumentFixture::parse(&DocumentFixture::single_book());
    assert_eq!(store.apply_item_document("Books", &single).unwrap(), 1);
    assert_eq!(store.get("Books").unwrap().data.len(), 3);

    let by_author = store.find_related("Books", "author", "9").unwrap();
    assert_eq!(by_author.len(), 3);
}

#[test]
fn test_included_resources_land_in_their_collections() {
    let config = ConfigFixture::resolved();
    let mut store = CollectionStore::from_config(&config);
    let document = DocumentFixture::parse(&DocumentFixture::books_page());

    assert_eq!(store.absorb_included(&document, &config.type_index), 2);
    assert_eq!(store.get_item("People", "9").unwrap().unwrap().route, "People");
    assert_eq!(store.get_item("Tags", "t1").unwrap().unwrap().attribute("label"), Some(&json!("sf")));

    // Already cached: nothing new
    assert_eq!(store.absorb_included(&document, &config.type_index), 0);
}

#[test]
fn test_request_plan_follows_store_search() {
    let config = ConfigFixture::resolved();
    let mut store = CollectionStore::from_config(&config);
    let books = config.collection("Books").unwrap();

    let state = store.get("Books").unwrap();
    let plan = RequestPlan::list(books, &state.search, state.offset, state.limit);
    assert_eq!(plan.method, HttpMethod::Get);

    store.set_search("Books", "dune").unwrap();
    let state = store.get("Books").unwrap();
    let plan = RequestPlan::list(books, &state.search, state.offset, state.limit);
    assert_eq!(plan.method, HttpMethod::Post);
    assert_eq!(plan.path, "/books/search");
}

#[test]
fn test_edit_requests_from_cached_record() {
    let config = ConfigFixture::resolved();
    let mut store = CollectionStore::from_config(&config);
    let books = config.collection("Books").unwrap();
    let document = DocumentFixture::parse(&DocumentFixture::books_page());
    store.replace_list("Books", ListPage::from_document(0, 25, &document, "Books")).unwrap();

    // Saving a cached row sends its title but not the resolved author
    let row = store.get_item("Books", "1").unwrap().unwrap().to_value();
    let save = RequestPlan::save(books, Some("1"), row.as_object().unwrap());
    assert_eq!(save.method, HttpMethod::Patch);
    assert_eq!(save.body.unwrap()["data"]["attributes"], json!({"title": "Dune"}));

    let author = &books.columns[1];
    let relink = RequestPlan::update_relationship(
        books,
        author,
        "1",
        &RelationshipUpdate::One(Some(ResourceIdentifier::new("8", "Person"))),
    );
    assert_eq!(relink.to_string(), "PATCH /books/1/author");

    let delete = RequestPlan::delete(books, "1");
    assert_eq!(delete.to_string(), "DELETE /books/1");
    assert_eq!(store.remove_items("Books", &["1"]).unwrap(), 1);
    assert!(!store.get("Books").unwrap().contains("1"));
}

#[test]
fn test_unknown_collection_fails_fast() {
    let mut store = CollectionStore::from_config(&ConfigFixture::resolved());
    let err = store.begin_fetch("Authors").unwrap_err();
    assert!(matches!(err, AdminError::CollectionNotFound { ref name } if name == "Authors"));
}

#[tokio::test]
async fn test_out_of_order_responses_keep_newest_page() {
    let store = Arc::new(Mutex::new(CollectionStore::from_config(&ConfigFixture::resolved())));

    // Page 1 is requested first but its response arrives last
    let first = store.lock().await.begin_fetch("Books").unwrap();
    let second = store.lock().await.begin_fetch("Books").unwrap();

    let slow = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            store.lock().await.apply_list_document(&first, 0, 25, &page(&["1", "2"], 50)).unwrap()
        })
    };
    let fast = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store.lock().await.apply_list_document(&second, 25, 25, &page(&["26", "27"], 50)).unwrap()
        })
    };

    assert_eq!(fast.await.unwrap(), ApplyOutcome::Applied);
    assert!(!slow.await.unwrap().is_applied());

    let store = store.lock().await;
    let books = store.get("Books").unwrap();
    assert_eq!(books.offset, 25);
    assert_eq!(books.data[0].id, "26");
}
