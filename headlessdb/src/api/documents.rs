//! Documents addressed through their collection's ID.
//!
//! A document reached through `/collection/{collection}/document/{document}` must
//! reference that collection. The collection itself does not have to exist any
//! more, so documents of a deleted collection stay reachable. Data keys are
//! rendered next to `_id` and `_collection`, so those two are rejected on write.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;
use uuid::Uuid;

use headlessdb_core::{
    document::{Document, DocumentData},
    error::StoreError,
    registry::CollectionLocator,
};

use crate::{
    api::{
        collection_id,
        error::ApiError,
        views::{check_flat_keys, flat_document},
    },
    app::AppState,
};

/// Loads a document and checks it belongs to the collection in the path.
async fn owned_document(state: &AppState, collection: &str, document: &str) -> Result<Document, ApiError> {
    let not_found = || ApiError::from(StoreError::DocumentNotFound(document.to_string()));

    let (Ok(collection_id), Ok(document_id)) = (Uuid::parse_str(collection), Uuid::parse_str(document)) else {
        return Err(not_found());
    };

    let document = state.documents.get(&document_id).await?;
    if document.collection_ref != collection_id {
        return Err(not_found());
    }

    Ok(document)
}

pub async fn list(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let id = collection_id(&collection)?;
    let documents = state.documents.list_by_collection(&CollectionLocator::Id(id)).await?;

    Ok(Json(documents.into_iter().map(flat_document).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: Result<Json<DocumentData>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = collection_id(&collection)?;
    let Json(data) = body?;
    check_flat_keys(&data)?;
    let document = state.documents.create(&CollectionLocator::Id(id), data).await?;

    Ok((StatusCode::CREATED, Json(flat_document(document))))
}

pub async fn get(
    State(state): State<AppState>,
    Path((collection, document)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let document = owned_document(&state, &collection, &document).await?;

    Ok(Json(flat_document(document)))
}

pub async fn update(
    State(state): State<AppState>,
    Path((collection, document)): Path<(String, String)>,
    body: Result<Json<DocumentData>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let document = owned_document(&state, &collection, &document).await?;
    let Json(data) = body?;
    check_flat_keys(&data)?;
    let document = state.documents.update(&document.id, data).await?;

    Ok(Json(flat_document(document)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((collection, document)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let document = owned_document(&state, &collection, &document).await?;
    state.documents.delete(&document.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
