//! headlessdb: a headless JSON document database served over HTTP.
//!
//! Clients define collections (a name plus typed field specs) and then create,
//! read, update and delete documents that are checked against those field specs
//! on every write. The schema and storage logic lives in [`headlessdb_core`]; this
//! crate adds the HTTP routes, configuration, logging and process bootstrap.
//!
//! # Backends
//!
//! - [`memory`] - In-process storage, the default
//! - [`mongodb`] - Persistent MongoDB storage (requires the `mongodb` feature)
//!
//! # Embedding
//!
//! ```ignore
//! use headlessdb::{api, app::AppState, memory::InMemoryStore};
//!
//! let state = AppState::new(InMemoryStore::new());
//! let router = api::router(state.clone());
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod logging;

pub use headlessdb_core::{backend, document, error, query, record, registry, schema, store, validation};

/// In-memory storage backend.
pub mod memory {
    pub use headlessdb_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use headlessdb_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
