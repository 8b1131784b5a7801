//! Typed access to one namespace of a backend.
//!
//! A [`RecordSet`] pairs a backend with a [`Record`] type so callers work with
//! `Collection`/`Document` values instead of raw BSON.

use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    backend::DynStoreBackend,
    error::StoreResult,
    query::Query,
    record::{Record, RecordExt, storage_key},
};

#[derive(Debug)]
pub struct RecordSet<'a, R: Record> {
    backend: &'a dyn DynStoreBackend,
    _marker: PhantomData<R>,
}

impl<'a, R: Record> RecordSet<'a, R> {
    pub(crate) fn new(backend: &'a dyn DynStoreBackend) -> Self {
        Self { backend, _marker: PhantomData }
    }

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if serialization fails or
    /// a record with the same ID already exists.
    pub async fn insert(&self, record: &R) -> StoreResult<()> {
        self.backend
            .insert_records(vec![(record.storage_key(), record.to_bson()?)], R::namespace())
            .await
    }

    /// Replaces an existing record wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RecordNotFound`](crate::error::StoreError::RecordNotFound)
    /// if no record has this ID.
    pub async fn replace(&self, record: &R) -> StoreResult<()> {
        self.backend
            .replace_records(vec![(record.storage_key(), record.to_bson()?)], R::namespace())
            .await
    }

    /// Deletes a record by ID.
    pub async fn delete(&self, id: &Uuid) -> StoreResult<()> {
        self.backend
            .delete_records(vec![storage_key(id)], R::namespace())
            .await
    }

    /// Retrieves a record by ID, or `None` if it does not exist.
    pub async fn get(&self, id: &Uuid) -> StoreResult<Option<R>> {
        self.backend
            .get_records(vec![storage_key(id)], R::namespace())
            .await?
            .into_iter()
            .next()
            .map(R::from_bson)
            .transpose()
    }

    /// Returns every record matching the query, in store order.
    pub async fn query(&self, query: Query) -> StoreResult<Vec<R>> {
        self.backend
            .query_records(query, R::namespace())
            .await?
            .into_iter()
            .map(R::from_bson)
            .collect::<StoreResult<Vec<R>>>()
    }
}
