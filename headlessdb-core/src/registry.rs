//! The collection registry: lifecycle of collection definitions.
//!
//! The registry owns its own [`Storage`] handle and knows nothing about documents.
//! Deleting a collection leaves documents that reference it untouched.

use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{StoreError, StoreResult},
    query::{Filter, Query},
    record::field_value,
    record_set::RecordSet,
    schema::{Collection, CollectionPatch, NewCollection, check_fields, check_name},
    store::Storage,
};

/// How a caller refers to a collection: by its ID or by its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionLocator {
    Id(Uuid),
    Name(String),
}

impl fmt::Display for CollectionLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionLocator::Id(id) => write!(f, "id {id}"),
            CollectionLocator::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

impl From<Uuid> for CollectionLocator {
    fn from(id: Uuid) -> Self {
        CollectionLocator::Id(id)
    }
}

#[derive(Debug)]
pub struct CollectionRegistry {
    storage: Storage,
}

impl CollectionRegistry {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    fn collections(&self) -> RecordSet<'_, Collection> {
        self.storage.records::<Collection>()
    }

    /// Creates a collection with a fresh ID.
    ///
    /// Names are not required to be unique.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] if the name is blank or a field spec lacks
    /// a name or type.
    pub async fn create(&self, new: NewCollection) -> StoreResult<Collection> {
        check_name(&new.name)?;
        check_fields(&new.fields)?;

        let collection = Collection {
            id: Uuid::new_v4(),
            name: new.name,
            fields: new.fields,
        };

        self.collections().insert(&collection).await?;
        info!(id = %collection.id, name = %collection.name, fields = collection.fields.len(), "created collection");

        Ok(collection)
    }

    pub async fn get(&self, id: &Uuid) -> StoreResult<Collection> {
        self.collections()
            .get(id)
            .await?
            .ok_or_else(|| StoreError::CollectionNotFound(CollectionLocator::Id(*id)))
    }

    /// Lists every collection in store order.
    pub async fn list(&self) -> StoreResult<Vec<Collection>> {
        self.collections().query(Query::all()).await
    }

    /// Applies a partial update. Attributes absent from the patch keep their value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CollectionNotFound`] for an unknown ID and
    /// [`StoreError::InvalidInput`] if a provided attribute is malformed.
    pub async fn update(&self, id: &Uuid, patch: CollectionPatch) -> StoreResult<Collection> {
        let mut collection = self.get(id).await?;

        if patch.is_empty() {
            return Ok(collection);
        }

        if let Some(name) = patch.name {
            check_name(&name)?;
            collection.name = name;
        }
        if let Some(fields) = patch.fields {
            check_fields(&fields)?;
            collection.fields = fields;
        }

        match self.collections().replace(&collection).await {
            Err(StoreError::RecordNotFound(..)) => {
                Err(StoreError::CollectionNotFound(CollectionLocator::Id(*id)))
            }
            Err(err) => Err(err),
            Ok(()) => {
                info!(id = %collection.id, name = %collection.name, "updated collection");
                Ok(collection)
            }
        }
    }

    /// Deletes a collection. Its documents are not touched.
    pub async fn delete(&self, id: &Uuid) -> StoreResult<()> {
        match self.collections().delete(id).await {
            Err(StoreError::RecordNotFound(..)) => {
                Err(StoreError::CollectionNotFound(CollectionLocator::Id(*id)))
            }
            Err(err) => Err(err),
            Ok(()) => {
                info!(id = %id, "deleted collection");
                Ok(())
            }
        }
    }

    /// Finds the first collection, in store order, with the given name.
    pub async fn find_by_name(&self, name: &str) -> StoreResult<Collection> {
        self.collections()
            .query(
                Query::builder()
                    .filter(Filter::eq("name", field_value(&name)?))
                    .build(),
            )
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::CollectionNotFound(CollectionLocator::Name(name.to_string())))
    }

    /// Resolves a locator of either kind to the collection it names.
    pub async fn resolve(&self, locator: &CollectionLocator) -> StoreResult<Collection> {
        debug!(%locator, "resolving collection");

        match locator {
            CollectionLocator::Id(id) => self.get(id).await,
            CollectionLocator::Name(name) => self.find_by_name(name).await,
        }
    }

    /// Shuts down the registry's storage handle.
    pub async fn shutdown(self) -> StoreResult<()> {
        self.storage.shutdown().await
    }
}
