//! Core traits for values persisted through a storage backend.
//!
//! Collections and documents are both stored as records: serde types with a UUID
//! and a fixed namespace. This module converts them to and from the BSON form that
//! backends store.

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreResult;

/// Trait for every type persisted through a [`StoreBackend`](crate::backend::StoreBackend).
///
/// # Example
///
/// ```ignore
/// use headlessdb_core::record::Record;
/// use serde::{Serialize, Deserialize};
/// use uuid::Uuid;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Tag {
///     pub id: Uuid,
///     pub label: String,
/// }
///
/// impl Record for Tag {
///     fn id(&self) -> &Uuid {
///         &self.id
///     }
///
///     fn namespace() -> &'static str {
///         "tags"
///     }
/// }
/// ```
pub trait Record: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this record's unique identifier.
    fn id(&self) -> &Uuid;

    /// Returns the backend namespace records of this type live in.
    fn namespace() -> &'static str;
}

/// Extension trait providing BSON conversion for records.
///
/// Automatically implemented for all types that implement [`Record`].
pub trait RecordExt: Record {
    /// Converts this record to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> StoreResult<Bson>;

    /// Creates a record from a stored BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> StoreResult<Self>;

    /// Returns the key this record is stored under.
    fn storage_key(&self) -> bson::Uuid {
        storage_key(self.id())
    }
}

impl<R: Record> RecordExt for R {
    fn to_bson(&self) -> StoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> StoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}

/// Converts a record ID into the key type backends index by.
pub fn storage_key(id: &Uuid) -> bson::Uuid {
    bson::Uuid::from_bytes(*id.as_bytes())
}

/// Serializes a value the same way it is serialized inside a stored record.
///
/// Filters built from this compare equal to the stored field regardless of how the
/// BSON serializer represents the type.
pub fn field_value<T: Serialize>(value: &T) -> StoreResult<Bson> {
    Ok(serialize_to_bson(value)?)
}
