//! Documents addressed through their collection's name.
//!
//! These routes wrap document data in a `data` envelope and report failures as
//! `{"error": ...}`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use headlessdb_core::registry::CollectionLocator;

use crate::{
    api::{
        error::ApiError,
        views::{EnvelopedData, EnvelopedDocument},
    },
    app::AppState,
};

pub async fn create(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<EnvelopedData>, JsonRejection>,
) -> Result<(StatusCode, Json<EnvelopedDocument>), ApiError> {
    let Json(EnvelopedData { data }) = body.map_err(|rejection| ApiError::from(rejection).named())?;
    let document = state
        .documents
        .create(&CollectionLocator::Name(name), data)
        .await
        .map_err(|err| ApiError::from(err).named())?;

    Ok((StatusCode::CREATED, Json(document.into())))
}

pub async fn list(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<EnvelopedDocument>>, ApiError> {
    let documents = state
        .documents
        .list_by_collection(&CollectionLocator::Name(name))
        .await
        .map_err(|err| ApiError::from(err).named())?;

    Ok(Json(documents.into_iter().map(EnvelopedDocument::from).collect()))
}
