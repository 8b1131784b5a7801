//! MongoDB backend for headlessdb.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait so
//! collections and documents survive restarts. The server enables it with the
//! `mongodb` feature:
//!
//! ```toml
//! [dependencies]
//! headlessdb = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! Collections live in a `collections` MongoDB collection and documents in a
//! `documents` one, each keyed by `_id`.
//!
//! # Example
//!
//! ```ignore
//! use headlessdb_core::backend::StoreBackendBuilder;
//! use headlessdb_mongodb::MongoDbStore;
//!
//! let store = MongoDbStore::builder("mongodb://localhost:27017", "headlessdb")
//!     .build()
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as headlessdb_mongodb;

pub mod store;
pub mod query;
pub mod sanitizer;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
