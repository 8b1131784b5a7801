use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use headlessdb_core::schema::{CollectionPatch, NewCollection};

use crate::{
    api::{collection_id, error::ApiError, views::CollectionView},
    app::AppState,
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CollectionView>>, ApiError> {
    let collections = state.registry.list().await?;

    Ok(Json(collections.into_iter().map(CollectionView::from).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewCollection>, JsonRejection>,
) -> Result<(StatusCode, Json<CollectionView>), ApiError> {
    let Json(new) = body?;
    let collection = state.registry.create(new).await?;

    Ok((StatusCode::CREATED, Json(collection.into())))
}

pub async fn get(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<CollectionView>, ApiError> {
    let id = collection_id(&collection)?;

    Ok(Json(state.registry.get(&id).await?.into()))
}

pub async fn update(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: Result<Json<CollectionPatch>, JsonRejection>,
) -> Result<Json<CollectionView>, ApiError> {
    let id = collection_id(&collection)?;
    let Json(patch) = body?;

    Ok(Json(state.registry.update(&id, patch).await?.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = collection_id(&collection)?;
    state.registry.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
