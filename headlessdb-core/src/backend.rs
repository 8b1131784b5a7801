//! Storage backend abstraction.
//!
//! A backend is a key-addressable record store: records are BSON values keyed by
//! UUID inside named namespaces. The registry and the document service never talk
//! to a database product directly; they go through [`StoreBackend`] (or its
//! object-safe twin [`DynStoreBackend`] when the backend is picked at runtime).
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: Dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Example
//!
//! ```ignore
//! use headlessdb_core::backend::StoreBackend;
//! use bson::{Uuid, Bson, doc};
//!
//! let backend = MyBackendImpl::new();
//! let id = Uuid::new();
//! backend.insert_records(vec![(id, Bson::Document(doc! { "name": "books" }))], "collections").await?;
//! ```

use async_trait::async_trait;
use bson::{Bson, Uuid};
use std::fmt::Debug;

use crate::{error::StoreResult, query::Query};

/// Abstract interface for record storage backends.
///
/// # Thread Safety
///
/// Implementations must be safe to share between request handlers. A write to a
/// single record must be atomic with respect to concurrent reads of that record;
/// nothing stronger is required.
///
/// # Error Handling
///
/// Missing records on replace/delete are reported as
/// [`StoreError::RecordNotFound`](crate::error::StoreError::RecordNotFound); driver
/// failures as [`StoreError::Backend`](crate::error::StoreError::Backend).
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts new records into a namespace.
    ///
    /// The namespace is created on first use. Inserting an ID that already exists is an error.
    async fn insert_records(
        &self,
        records: Vec<(Uuid, Bson)>,
        namespace: &str,
    ) -> StoreResult<()>;

    /// Replaces existing records entirely.
    ///
    /// Every ID must already exist in the namespace.
    async fn replace_records(
        &self,
        records: Vec<(Uuid, Bson)>,
        namespace: &str,
    ) -> StoreResult<()>;

    /// Deletes records by ID. Every ID must exist.
    async fn delete_records(&self, ids: Vec<Uuid>, namespace: &str) -> StoreResult<()>;

    /// Retrieves records by ID.
    ///
    /// IDs that don't exist are omitted from the result rather than reported as errors.
    async fn get_records(
        &self,
        ids: Vec<Uuid>,
        namespace: &str,
    ) -> StoreResult<Vec<Bson>>;

    /// Returns every record in the namespace matching the query, in store order.
    async fn query_records(
        &self,
        query: Query,
        namespace: &str,
    ) -> StoreResult<Vec<Bson>>;

    /// Cleanly shuts down the backend, releasing connections and other resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> StoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Object-safe version of [`StoreBackend`], implemented for every backend.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_records(
        &self,
        records: Vec<(Uuid, Bson)>,
        namespace: &str,
    ) -> StoreResult<()>;
    async fn replace_records(
        &self,
        records: Vec<(Uuid, Bson)>,
        namespace: &str,
    ) -> StoreResult<()>;
    async fn delete_records(&self, ids: Vec<Uuid>, namespace: &str) -> StoreResult<()>;
    async fn get_records(
        &self,
        ids: Vec<Uuid>,
        namespace: &str,
    ) -> StoreResult<Vec<Bson>>;
    async fn query_records(
        &self,
        query: Query,
        namespace: &str,
    ) -> StoreResult<Vec<Bson>>;
    async fn shutdown_boxed(self: Box<Self>) -> StoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + 'static> DynStoreBackend for B {
    async fn insert_records(
        &self,
        records: Vec<(Uuid, Bson)>,
        namespace: &str,
    ) -> StoreResult<()> {
        StoreBackend::insert_records(self, records, namespace).await
    }

    async fn replace_records(
        &self,
        records: Vec<(Uuid, Bson)>,
        namespace: &str,
    ) -> StoreResult<()> {
        StoreBackend::replace_records(self, records, namespace).await
    }

    async fn delete_records(&self, ids: Vec<Uuid>, namespace: &str) -> StoreResult<()> {
        StoreBackend::delete_records(self, ids, namespace).await
    }

    async fn get_records(
        &self,
        ids: Vec<Uuid>,
        namespace: &str,
    ) -> StoreResult<Vec<Bson>> {
        StoreBackend::get_records(self, ids, namespace).await
    }

    async fn query_records(
        &self,
        query: Query,
        namespace: &str,
    ) -> StoreResult<Vec<Bson>> {
        StoreBackend::query_records(self, query, namespace).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> StoreResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

/// Asynchronously constructs a backend, e.g. after connecting to a server.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> StoreResult<Self::Backend>;
}
