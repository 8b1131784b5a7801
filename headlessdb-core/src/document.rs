//! Documents and the document store.
//!
//! Every write first resolves the owning collection through the
//! [`CollectionRegistry`], validates the data against its field specs and only
//! then persists. A rejected write stores nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::{StoreError, StoreResult},
    query::{Filter, Query},
    record::{Record, field_value},
    record_set::RecordSet,
    registry::{CollectionLocator, CollectionRegistry},
    schema::Collection,
    store::Storage,
    validation::{check_storable, validate_data},
};

/// Field holding the owning collection's ID in stored documents.
pub const COLLECTION_REF_FIELD: &str = "collectionRef";

/// Open key-value document payload.
pub type DocumentData = Map<String, Value>;

/// A record of open data owned by exactly one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    /// Set at creation and never reassigned.
    pub collection_ref: Uuid,
    #[serde(default, with = "stored_data")]
    pub data: DocumentData,
}

/// Serde adapter for document data.
///
/// The BSON serializer reads maps whose keys start with `$` as extended JSON
/// (`{"$numberLong": "5"}` becomes an integer). Keys starting with `$` or the
/// escape character `~` get one `~` prepended on the way in, and lose it on the
/// way out, so data keys are never interpreted.
mod stored_data {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Map, Value};

    const ESCAPE: char = '~';

    pub fn serialize<S: Serializer>(data: &Map<String, Value>, serializer: S) -> Result<S::Ok, S::Error> {
        escape_map(data).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Map<String, Value>, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(restore_map)
    }

    fn escape_map(map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| {
                let key = if key.starts_with('$') || key.starts_with(ESCAPE) {
                    format!("{ESCAPE}{key}")
                } else {
                    key.clone()
                };
                (key, escape_value(value))
            })
            .collect()
    }

    fn escape_value(value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(escape_map(map)),
            Value::Array(items) => Value::Array(items.iter().map(escape_value).collect()),
            other => other.clone(),
        }
    }

    fn restore_map(map: Map<String, Value>) -> Map<String, Value> {
        map.into_iter()
            .map(|(key, value)| {
                let key = match key.strip_prefix(ESCAPE) {
                    Some(original) => original.to_string(),
                    None => key,
                };
                (key, restore_value(value))
            })
            .collect()
    }

    fn restore_value(value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(restore_map(map)),
            Value::Array(items) => Value::Array(items.into_iter().map(restore_value).collect()),
            other => other,
        }
    }
}

impl Record for Document {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn namespace() -> &'static str {
        "documents"
    }
}

#[derive(Debug)]
pub struct DocumentStore {
    storage: Storage,
    registry: Arc<CollectionRegistry>,
}

impl DocumentStore {
    pub fn new(storage: Storage, registry: Arc<CollectionRegistry>) -> Self {
        Self { storage, registry }
    }

    fn documents(&self) -> RecordSet<'_, Document> {
        self.storage.records::<Document>()
    }

    fn validate(collection: &Collection, data: &DocumentData) -> StoreResult<()> {
        validate_data(&collection.fields, data)
            .and_then(|()| check_storable(data))
            .inspect_err(|err| {
                warn!(collection = %collection.id, error = %err, "rejected document data");
            })
    }

    /// Creates a document in the collection the locator resolves to.
    ///
    /// `data` is stored verbatim: no coercion and no defaults are applied.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CollectionNotFound`] if the locator does not resolve,
    /// [`StoreError::MissingRequiredField`] if a required field is absent and
    /// [`StoreError::InvalidInput`] if a number cannot be stored.
    pub async fn create(&self, locator: &CollectionLocator, data: DocumentData) -> StoreResult<Document> {
        let collection = self.registry.resolve(locator).await?;
        Self::validate(&collection, &data)?;

        let document = Document {
            id: Uuid::new_v4(),
            collection_ref: collection.id,
            data,
        };

        self.documents().insert(&document).await?;
        info!(id = %document.id, collection = %collection.id, "created document");

        Ok(document)
    }

    pub async fn get(&self, id: &Uuid) -> StoreResult<Document> {
        self.documents()
            .get(id)
            .await?
            .ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))
    }

    /// Lists every document referencing the resolved collection.
    pub async fn list_by_collection(&self, locator: &CollectionLocator) -> StoreResult<Vec<Document>> {
        let collection = self.registry.resolve(locator).await?;
        let documents = self
            .documents()
            .query(
                Query::builder()
                    .filter(Filter::eq(COLLECTION_REF_FIELD, field_value(&collection.id)?))
                    .build(),
            )
            .await?;

        debug!(collection = %collection.id, count = documents.len(), "listed documents");

        Ok(documents)
    }

    /// Replaces a document's data wholesale after validating it against the
    /// current schema of its collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown ID,
    /// [`StoreError::CollectionNotFound`] if the owning collection was deleted and
    /// [`StoreError::MissingRequiredField`] or [`StoreError::InvalidInput`] if the
    /// new data is invalid.
    pub async fn update(&self, id: &Uuid, data: DocumentData) -> StoreResult<Document> {
        let mut document = self.get(id).await?;
        let collection = self
            .registry
            .resolve(&CollectionLocator::Id(document.collection_ref))
            .await?;
        Self::validate(&collection, &data)?;

        document.data = data;

        match self.documents().replace(&document).await {
            Err(StoreError::RecordNotFound(..)) => Err(StoreError::DocumentNotFound(id.to_string())),
            Err(err) => Err(err),
            Ok(()) => {
                info!(id = %document.id, collection = %collection.id, "updated document");
                Ok(document)
            }
        }
    }

    pub async fn delete(&self, id: &Uuid) -> StoreResult<()> {
        match self.documents().delete(id).await {
            Err(StoreError::RecordNotFound(..)) => Err(StoreError::DocumentNotFound(id.to_string())),
            Err(err) => Err(err),
            Ok(()) => {
                info!(id = %id, "deleted document");
                Ok(())
            }
        }
    }

    /// Shuts down the document storage handle. The registry is shut down separately.
    pub async fn shutdown(self) -> StoreResult<()> {
        self.storage.shutdown().await
    }
}
