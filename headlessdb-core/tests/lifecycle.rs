use std::sync::Arc;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use headlessdb_core::{
    document::DocumentStore,
    error::{ErrorKind, StoreError},
    registry::{CollectionLocator, CollectionRegistry},
    schema::{CollectionPatch, FieldSpec, NewCollection},
    store::Storage,
};
use headlessdb_memory::InMemoryStore;

fn services() -> (Arc<CollectionRegistry>, DocumentStore) {
    let backend = InMemoryStore::new();
    let registry = Arc::new(CollectionRegistry::new(Storage::new(backend.clone())));
    let documents = DocumentStore::new(Storage::new(backend), registry.clone());

    (registry, documents)
}

fn data(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn test_collection() -> NewCollection {
    NewCollection::new(
        "testcollection",
        vec![
            FieldSpec::new("field1", "String").required(),
            FieldSpec::new("field2", "Number"),
        ],
    )
}

#[tokio::test]
async fn test_create_and_get_collection() {
    let (registry, _) = services();

    let created = registry.create(test_collection()).await.unwrap();
    let fetched = registry.get(&created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.fields[0].name, "field1");
    assert_eq!(fetched.fields[1].name, "field2");
    assert_eq!(registry.list().await.unwrap(), vec![created]);
}

#[tokio::test]
async fn test_create_collection_rejects_invalid_input() {
    let (registry, _) = services();

    let err = registry.create(NewCollection::new("", vec![])).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = registry
        .create(NewCollection::new("books", vec![FieldSpec::new("title", "")]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(registry.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_collection_is_partial() {
    let (registry, _) = services();
    let created = registry.create(test_collection()).await.unwrap();

    let renamed = registry
        .update(&created.id, CollectionPatch { name: Some("renamed".into()), fields: None })
        .await
        .unwrap();

    assert_eq!(renamed.name, "renamed");
    assert_eq!(renamed.fields, created.fields);
    assert_eq!(registry.get(&created.id).await.unwrap(), renamed);

    let err = registry
        .update(&Uuid::new_v4(), CollectionPatch { name: Some("x".into()), fields: None })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::CollectionNotFound(CollectionLocator::Id(_))));
}

#[tokio::test]
async fn test_delete_collection() {
    let (registry, _) = services();
    let created = registry.create(test_collection()).await.unwrap();

    registry.delete(&created.id).await.unwrap();

    assert_eq!(registry.get(&created.id).await.unwrap_err().to_string(), "Collection not found");
    assert_eq!(registry.delete(&created.id).await.unwrap_err().kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_find_by_name_returns_first_match() {
    let (registry, _) = services();
    let first = registry.create(NewCollection::new("dup", vec![])).await.unwrap();
    registry.create(NewCollection::new("other", vec![])).await.unwrap();
    registry.create(NewCollection::new("dup", vec![])).await.unwrap();

    assert_eq!(registry.find_by_name("dup").await.unwrap().id, first.id);
    assert_eq!(
        registry.resolve(&CollectionLocator::Name("dup".into())).await.unwrap().id,
        first.id,
    );
    assert!(matches!(
        registry.find_by_name("missing").await.unwrap_err(),
        StoreError::CollectionNotFound(CollectionLocator::Name(name)) if name == "missing",
    ));
}

#[tokio::test]
async fn test_document_data_round_trips() {
    let (registry, documents) = services();
    let collection = registry.create(test_collection()).await.unwrap();
    let payload = data(json!({
        "field1": "testvalue",
        "field2": 42,
        "extra": { "nested": [1, 2.5, null, true] },
    }));

    let created = documents
        .create(&CollectionLocator::Id(collection.id), payload.clone())
        .await
        .unwrap();
    let fetched = documents.get(&created.id).await.unwrap();

    assert_eq!(created.data, payload);
    assert_eq!(fetched.data, payload);
    assert_eq!(fetched.collection_ref, collection.id);
}

#[tokio::test]
async fn test_document_data_is_stored_verbatim() {
    let (registry, documents) = services();
    let collection = registry.create(test_collection()).await.unwrap();
    let payload = data(json!({
        "field1": "testvalue",
        "n": { "$numberLong": "5" },
        "when": { "$date": { "$numberLong": "0" } },
        "$where": "kept as text",
        "~escaped": { "~": [{ "$oid": "abc" }] },
        "floats": [0.1, -2.5, 1e300, 3.0],
        "ints": [i64::MAX, i64::MIN, 0],
        "nested": { "deep": { "deeper": [[], {}, null, false] } },
        "nothing": null,
    }));

    let created = documents.create(&collection.id.into(), payload.clone()).await.unwrap();
    assert_eq!(documents.get(&created.id).await.unwrap().data, payload);

    let listed = documents.list_by_collection(&collection.id.into()).await.unwrap();
    assert_eq!(listed[0].data, payload);

    let mut changed = payload.clone();
    changed.insert("$set".to_string(), json!({ "field1": "x" }));
    let updated = documents.update(&created.id, changed.clone()).await.unwrap();
    assert_eq!(updated.data, changed);
    assert_eq!(documents.get(&created.id).await.unwrap().data, changed);
}

#[tokio::test]
async fn test_oversized_integer_is_invalid_input() {
    let (registry, documents) = services();
    let collection = registry.create(test_collection()).await.unwrap();
    let locator = CollectionLocator::Id(collection.id);

    let err = documents
        .create(&locator, data(json!({ "field1": "x", "n": u64::MAX })))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(documents.list_by_collection(&locator).await.unwrap().is_empty());

    let created = documents.create(&locator, data(json!({ "field1": "x" }))).await.unwrap();
    let err = documents
        .update(&created.id, data(json!({ "field1": "x", "list": [u64::MAX] })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(documents.get(&created.id).await.unwrap().data, created.data);
}

#[tokio::test]
async fn test_missing_required_field_persists_nothing() {
    let (registry, documents) = services();
    let collection = registry.create(test_collection()).await.unwrap();
    let locator = CollectionLocator::Id(collection.id);

    let err = documents.create(&locator, data(json!({ "field2": 42 }))).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(err.to_string(), "Validation failed: field1: Path `field1` is required.");
    assert!(documents.list_by_collection(&locator).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_in_unknown_collection() {
    let (_, documents) = services();

    let err = documents
        .create(&CollectionLocator::Id(Uuid::new_v4()), data(json!({ "field1": "x" })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = documents
        .create(&CollectionLocator::Name("nope".into()), Map::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_by_collection_is_isolated() {
    let (registry, documents) = services();
    let books = registry.create(NewCollection::new("books", vec![])).await.unwrap();
    let films = registry.create(NewCollection::new("films", vec![])).await.unwrap();

    let first = documents.create(&books.id.into(), data(json!({ "n": 1 }))).await.unwrap();
    documents.create(&films.id.into(), data(json!({ "n": 2 }))).await.unwrap();
    let third = documents
        .create(&CollectionLocator::Name("books".into()), data(json!({ "n": 3 })))
        .await
        .unwrap();

    let listed = documents.list_by_collection(&books.id.into()).await.unwrap();
    assert_eq!(listed, vec![first, third]);

    let by_name = documents.list_by_collection(&CollectionLocator::Name("films".into())).await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].collection_ref, films.id);
}

#[tokio::test]
async fn test_update_document_replaces_data() {
    let (registry, documents) = services();
    let collection = registry.create(test_collection()).await.unwrap();
    let created = documents
        .create(&collection.id.into(), data(json!({ "field1": "a", "field2": 1 })))
        .await
        .unwrap();

    let updated = documents.update(&created.id, data(json!({ "field1": "b" }))).await.unwrap();
    assert_eq!(updated.data, data(json!({ "field1": "b" })));
    assert_eq!(documents.get(&created.id).await.unwrap().data, updated.data);

    let err = documents.update(&created.id, data(json!({ "field2": 2 }))).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(documents.get(&created.id).await.unwrap().data, updated.data);

    let err = documents.update(&Uuid::new_v4(), Map::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Document not found");
}

#[tokio::test]
async fn test_update_checks_current_schema() {
    let (registry, documents) = services();
    let collection = registry.create(NewCollection::new("books", vec![])).await.unwrap();
    let created = documents.create(&collection.id.into(), Map::new()).await.unwrap();

    registry
        .update(
            &collection.id,
            CollectionPatch { name: None, fields: Some(vec![FieldSpec::new("title", "String").required()]) },
        )
        .await
        .unwrap();

    let err = documents.update(&created.id, Map::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Validation failed: title: Path `title` is required.");
}

#[tokio::test]
async fn test_delete_document() {
    let (registry, documents) = services();
    let collection = registry.create(NewCollection::new("books", vec![])).await.unwrap();
    let created = documents.create(&collection.id.into(), Map::new()).await.unwrap();

    documents.delete(&created.id).await.unwrap();

    assert_eq!(documents.get(&created.id).await.unwrap_err().to_string(), "Document not found");
    assert_eq!(documents.delete(&created.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    assert!(documents.list_by_collection(&collection.id.into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_collection_keeps_documents() {
    let (registry, documents) = services();
    let collection = registry.create(test_collection()).await.unwrap();
    let created = documents
        .create(&collection.id.into(), data(json!({ "field1": "kept" })))
        .await
        .unwrap();

    registry.delete(&collection.id).await.unwrap();

    assert_eq!(documents.get(&created.id).await.unwrap(), created);
    assert_eq!(
        documents.list_by_collection(&collection.id.into()).await.unwrap_err().kind(),
        ErrorKind::NotFound,
    );
    assert!(matches!(
        documents.update(&created.id, data(json!({ "field1": "x" }))).await.unwrap_err(),
        StoreError::CollectionNotFound(_),
    ));
}

#[tokio::test]
async fn test_shutdown() {
    let (registry, documents) = services();

    documents.shutdown().await.unwrap();
    Arc::try_unwrap(registry).unwrap().shutdown().await.unwrap();
}
