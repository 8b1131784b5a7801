//! HTTP routes, all mounted under `/v1`.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET, POST | `/collection` | [`collections::list`], [`collections::create`] |
//! | GET, PATCH, DELETE | `/collection/{collection}` | [`collections`] |
//! | GET, POST | `/collection/{collection}/document` | [`documents::list`], [`documents::create`] |
//! | GET, PATCH, DELETE | `/collection/{collection}/document/{document}` | [`documents`] |
//! | GET, POST | `/collection/{collection}/documents` | [`named`], collection addressed by name |
//! | any | `/healthz` | [`healthz`] |

pub mod collections;
pub mod documents;
pub mod error;
pub mod named;
pub mod views;

use axum::{
    Router,
    routing::{any, get},
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use headlessdb_core::{error::StoreError, registry::CollectionLocator};

use crate::{api::error::ApiError, app::AppState};

pub fn router(state: AppState) -> Router {
    let v1 = Router::new()
        .route("/healthz", any(healthz))
        .route("/collection", get(collections::list).post(collections::create))
        .route(
            "/collection/{collection}",
            get(collections::get)
                .patch(collections::update)
                .delete(collections::delete),
        )
        .route(
            "/collection/{collection}/document",
            get(documents::list).post(documents::create),
        )
        .route(
            "/collection/{collection}/document/{document}",
            get(documents::get)
                .patch(documents::update)
                .delete(documents::delete),
        )
        .route(
            "/collection/{collection}/documents",
            get(named::list).post(named::create),
        );

    Router::new()
        .nest("/v1", v1)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn healthz() -> &'static str {
    "Hello, world!"
}

/// Parses a collection ID from the path. A malformed ID names no collection.
pub(crate) fn collection_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| StoreError::CollectionNotFound(CollectionLocator::Name(raw.to_string())).into())
}
