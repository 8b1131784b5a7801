//! In-memory storage backend for headlessdb.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It is the default backend of the server and the one every test runs against.
//! Data does not survive a restart.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use headlessdb_core::{registry::CollectionRegistry, store::Storage};
//! use headlessdb_memory::InMemoryStore;
//!
//! let backend = InMemoryStore::builder().build().await?;
//! let registry = Arc::new(CollectionRegistry::new(Storage::new(backend.clone())));
//! ```

#[allow(unused_extern_crates)]
extern crate self as headlessdb_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
