//! In-memory storage implementation.
//!
//! Records are kept as BSON values in insertion-ordered maps behind an
//! async-aware read-write lock.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use indexmap::IndexMap;
use mea::rwlock::RwLock;
use bson::{Uuid, Bson};

use headlessdb_core::{
    query::Query,
    error::{StoreError, StoreResult},
    backend::{StoreBackend, StoreBackendBuilder},
};

use crate::evaluator::RecordEvaluator;

type NamespaceMap = IndexMap<String, Bson>;
type StoreMap = HashMap<String, NamespaceMap>;


/// Thread-safe in-memory record storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state. Clones
/// share the same underlying data, so the collection registry and the document
/// store can each hold a handle to one store.
///
/// Queries scan every record in the namespace. Results come back in insertion
/// order, which is what makes "first collection with this name" well defined.
///
/// # Example
///
/// ```ignore
/// use headlessdb_memory::InMemoryStore;
/// use headlessdb_core::backend::StoreBackend;
/// use bson::{Uuid, Bson, doc};
///
/// let store = InMemoryStore::new();
/// let id = Uuid::new();
/// store.insert_records(vec![(id, Bson::Document(doc! { "name": "books" }))], "collections").await?;
///
/// let records = store.get_records(vec![id], "collections").await?;
/// assert_eq!(records.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// namespace -> (record id -> record)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_records(&self, records: Vec<(Uuid, Bson)>, namespace: &str) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let namespace_map = store
            .entry(namespace.to_string())
            .or_default();

        for (id, _) in &records {
            let key = id.to_string();

            if namespace_map.contains_key(&key) {
                return Err(StoreError::RecordAlreadyExists(key, namespace.to_string()));
            }
        }

        for (id, record) in records {
            namespace_map.insert(id.to_string(), record);
        }

        Ok(())
    }

    async fn replace_records(&self, records: Vec<(Uuid, Bson)>, namespace: &str) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let Some(namespace_map) = store.get_mut(namespace) else {
            return match records.first() {
                Some((id, _)) => Err(StoreError::RecordNotFound(id.to_string(), namespace.to_string())),
                None => Ok(()),
            };
        };

        for (id, _) in &records {
            let key = id.to_string();

            if !namespace_map.contains_key(&key) {
                return Err(StoreError::RecordNotFound(key, namespace.to_string()));
            }
        }

        for (id, record) in records {
            // Existing key: keeps its position.
            namespace_map.insert(id.to_string(), record);
        }

        Ok(())
    }

    async fn delete_records(&self, ids: Vec<Uuid>, namespace: &str) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let Some(namespace_map) = store.get_mut(namespace) else {
            return match ids.first() {
                Some(id) => Err(StoreError::RecordNotFound(id.to_string(), namespace.to_string())),
                None => Ok(()),
            };
        };

        for id in &ids {
            let key = id.to_string();

            if !namespace_map.contains_key(&key) {
                return Err(StoreError::RecordNotFound(key, namespace.to_string()));
            }
        }

        for id in ids {
            namespace_map.shift_remove(&id.to_string());
        }

        Ok(())
    }

    async fn get_records(&self, ids: Vec<Uuid>, namespace: &str) -> StoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let namespace_map = match store.get(namespace) {
            Some(map) => map,
            None => return Ok(vec![]),
        };

        Ok(
            ids
                .iter()
                .filter_map(|id| namespace_map.get(&id.to_string()))
                .cloned()
                .collect()
        )
    }

    async fn query_records(&self, query: Query, namespace: &str) -> StoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let namespace_map = match store.get(namespace) {
            Some(map) => map,
            None => return Ok(vec![]),
        };

        match &query.filter {
            Some(filter) => RecordEvaluator::filter_records(namespace_map.values(), filter),
            None => Ok(namespace_map.values().cloned().collect()),
        }
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use headlessdb_core::query::Filter;

    use super::*;

    fn record(name: &str) -> Bson {
        Bson::Document(doc! { "name": name })
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryStore::new();
        let id = Uuid::new();

        store.insert_records(vec![(id, record("books"))], "collections").await.unwrap();

        let records = store.get_records(vec![id, Uuid::new()], "collections").await.unwrap();
        assert_eq!(records, vec![record("books")]);
        assert!(store.get_records(vec![id], "documents").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_duplicate_is_rejected() {
        let store = InMemoryStore::new();
        let id = Uuid::new();

        store.insert_records(vec![(id, record("books"))], "collections").await.unwrap();
        let err = store.insert_records(vec![(id, record("films"))], "collections").await.unwrap_err();

        assert!(matches!(err, StoreError::RecordAlreadyExists(..)));
        assert_eq!(store.get_records(vec![id], "collections").await.unwrap(), vec![record("books")]);
    }

    #[tokio::test]
    async fn test_replace_and_delete_missing() {
        let store = InMemoryStore::new();
        let id = Uuid::new();

        let err = store.replace_records(vec![(id, record("books"))], "collections").await.unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound(..)));

        store.insert_records(vec![(Uuid::new(), record("films"))], "collections").await.unwrap();

        let err = store.replace_records(vec![(id, record("books"))], "collections").await.unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound(..)));
        let err = store.delete_records(vec![id], "collections").await.unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound(..)));
    }

    #[tokio::test]
    async fn test_replace_keeps_position_and_delete_removes() {
        let store = InMemoryStore::new();
        let (a, b, c) = (Uuid::new(), Uuid::new(), Uuid::new());

        store
            .insert_records(vec![(a, record("a")), (b, record("b")), (c, record("c"))], "collections")
            .await
            .unwrap();
        store.replace_records(vec![(a, record("a2"))], "collections").await.unwrap();
        store.delete_records(vec![b], "collections").await.unwrap();

        let all = store.query_records(Query::all(), "collections").await.unwrap();
        assert_eq!(all, vec![record("a2"), record("c")]);
        assert!(store.get_records(vec![b], "collections").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_filters_in_insertion_order() {
        let store = InMemoryStore::builder().build().await.unwrap();
        let first = Bson::Document(doc! { "name": "dup", "n": 1 });
        let second = Bson::Document(doc! { "name": "other", "n": 2 });
        let third = Bson::Document(doc! { "name": "dup", "n": 3 });

        store
            .insert_records(
                vec![(Uuid::new(), first.clone()), (Uuid::new(), second), (Uuid::new(), third.clone())],
                "collections",
            )
            .await
            .unwrap();

        let matched = store
            .query_records(Query::builder().filter(Filter::eq("name", "dup")).build(), "collections")
            .await
            .unwrap();
        assert_eq!(matched, vec![first, third]);
        assert!(store.query_records(Query::all(), "documents").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryStore::new();
        let handle = store.clone();
        let id = Uuid::new();

        handle.insert_records(vec![(id, record("books"))], "collections").await.unwrap();

        assert_eq!(store.get_records(vec![id], "collections").await.unwrap().len(), 1);
    }
}
