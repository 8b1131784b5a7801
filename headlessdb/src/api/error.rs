use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use headlessdb_core::{
    error::{ErrorKind, StoreError},
    registry::CollectionLocator,
};

/// Body shape of an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorStyle {
    /// `{"message": ...}`, used by the ID-addressed routes.
    Message,
    /// `{"error": ...}`, used by the name-addressed routes.
    Error,
}

/// A failed request: the core error plus the body shape to report it in.
#[derive(Debug)]
pub struct ApiError {
    error: StoreError,
    style: ErrorStyle,
}

impl ApiError {
    /// Switches to the `{"error": ...}` body used by name-addressed routes.
    pub fn named(mut self) -> Self {
        self.style = ErrorStyle::Error;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ValidationFailed | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn text(&self) -> String {
        if self.kind() == ErrorKind::Internal {
            return "Internal server error".to_string();
        }

        match (&self.error, self.style) {
            (StoreError::CollectionNotFound(CollectionLocator::Name(name)), ErrorStyle::Error) => {
                format!("Collection '{name}' not found")
            }
            (err, _) => err.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        Self { error, style: ErrorStyle::Message }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        StoreError::InvalidInput(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.kind() == ErrorKind::Internal {
            error!(error = %self.error, "request failed");
        }

        let text = self.text();
        let body = match self.style {
            ErrorStyle::Message => json!({ "message": text }),
            ErrorStyle::Error => json!({ "error": text }),
        };

        (self.status(), Json(body)).into_response()
    }
}
