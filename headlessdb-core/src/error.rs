//! Error types and result types for registry, document and backend operations.
//!
//! Every fallible operation in this crate returns [`StoreResult<T>`]. Callers at the
//! service boundary classify errors with [`StoreError::kind`] instead of matching on
//! individual variants.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

use crate::registry::CollectionLocator;

/// Represents all possible errors that can occur when working with collections and documents.
///
/// Variants cover the domain outcomes surfaced to clients (missing collections or
/// documents, schema violations, malformed input) as well as serialization and
/// backend failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Serialization/deserialization error when converting between record formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during backend initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A record with the given ID already exists.
    /// The first argument is the record ID, the second is the namespace.
    #[error("Record {0} already exists in {1}")]
    RecordAlreadyExists(String, String),
    /// A record with the given ID does not exist.
    /// The first argument is the record ID, the second is the namespace.
    #[error("Record {0} not found in {1}")]
    RecordNotFound(String, String),
    /// No collection matches the locator.
    #[error("Collection not found")]
    CollectionNotFound(CollectionLocator),
    /// No document has the given ID.
    #[error("Document not found")]
    DocumentNotFound(String),
    /// A field marked as required is absent from the document data.
    #[error("Validation failed: {field}: Path `{field}` is required.")]
    MissingRequiredField {
        field: String,
    },
    /// A collection definition or request payload is malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Coarse classification of a [`StoreError`], used by the HTTP boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The collection or document does not exist.
    NotFound,
    /// Document data does not satisfy its collection's field specs.
    ValidationFailed,
    /// The request payload is malformed.
    InvalidInput,
    /// Unexpected serialization or persistence failure.
    Internal,
}

impl StoreError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::CollectionNotFound(_)
            | StoreError::DocumentNotFound(_)
            | StoreError::RecordNotFound(..) => ErrorKind::NotFound,
            StoreError::MissingRequiredField { .. } => ErrorKind::ValidationFailed,
            StoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            StoreError::Serialization(_)
            | StoreError::Initialization(_)
            | StoreError::RecordAlreadyExists(..)
            | StoreError::Backend(_) => ErrorKind::Internal,
        }
    }
}

/// A specialized `Result` type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<BsonError> for StoreError {
    fn from(err: BsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for StoreError {
    fn from(err: SerdeJsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
