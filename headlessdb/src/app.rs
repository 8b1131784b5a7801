//! Application state: the collection registry and document store shared by every
//! request handler, plus backend selection at process start.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use headlessdb_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::DocumentStore,
    error::{StoreError, StoreResult},
    registry::CollectionRegistry,
    store::Storage,
};
use headlessdb_memory::InMemoryStore;

use crate::config::{BackendKind, Config};

/// Errors that stop the server process.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<CollectionRegistry>,
    pub documents: Arc<DocumentStore>,
}

impl AppState {
    /// Builds the registry and the document store over one shared backend. Each
    /// gets its own storage handle.
    pub fn new<B: StoreBackend + Clone + 'static>(backend: B) -> Self {
        let registry = Arc::new(CollectionRegistry::new(Storage::new(backend.clone())));
        let documents = Arc::new(DocumentStore::new(Storage::new(backend), registry.clone()));

        Self { registry, documents }
    }

    /// Opens the backend named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Initialization`] if the backend cannot be reached or was
    /// not compiled in.
    pub async fn open(config: &Config) -> StoreResult<Self> {
        match config.backend {
            BackendKind::Memory => {
                info!("using in-memory storage");
                Ok(Self::new(InMemoryStore::builder().build().await?))
            }
            #[cfg(feature = "mongodb")]
            BackendKind::Mongodb => {
                info!(database = %config.mongodb_database, "using MongoDB storage");
                let backend = headlessdb_mongodb::MongoDbStore::builder(&config.mongodb_uri, &config.mongodb_database)
                    .build()
                    .await?;
                Ok(Self::new(backend))
            }
            #[cfg(not(feature = "mongodb"))]
            BackendKind::Mongodb => Err(StoreError::Initialization(
                "the mongodb backend requires building with the `mongodb` feature".to_string(),
            )),
        }
    }

    /// Shuts down both storage handles. Must be called once no request handler
    /// holds a clone of this state.
    pub async fn shutdown(self) -> StoreResult<()> {
        let AppState { registry, documents } = self;

        match Arc::try_unwrap(documents) {
            Ok(documents) => documents.shutdown().await?,
            Err(_) => warn!("document store still in use, skipping shutdown"),
        }

        match Arc::try_unwrap(registry) {
            Ok(registry) => registry.shutdown().await?,
            Err(_) => warn!("collection registry still in use, skipping shutdown"),
        }

        info!("storage shut down");

        Ok(())
    }
}
