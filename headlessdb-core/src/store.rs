//! Owned storage handles.
//!
//! A [`Storage`] owns one backend instance behind dynamic dispatch, so the backend
//! kind can be picked from configuration at process start. The registry and the
//! document service each receive their own handle.
//!
//! ```ignore
//! use headlessdb_core::store::Storage;
//!
//! let storage = Storage::new(backend);
//! let collections = storage.records::<Collection>();
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    error::StoreResult,
    record::Record,
    record_set::RecordSet,
};

#[derive(Debug)]
pub struct Storage {
    backend: Box<dyn DynStoreBackend>,
}

impl Storage {
    /// Creates a storage handle owning the given backend.
    pub fn new<B: StoreBackend + 'static>(backend: B) -> Self {
        Self { backend: Box::new(backend) }
    }

    /// Gets typed access to the namespace of record type `R`.
    pub fn records<R: Record>(&self) -> RecordSet<'_, R> {
        RecordSet::new(&*self.backend)
    }

    /// Shuts down the store and releases backend resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to shut down cleanly.
    pub async fn shutdown(self) -> StoreResult<()> {
        self.backend.shutdown_boxed().await
    }
}
