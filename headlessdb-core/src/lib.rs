//! Core of headlessdb: schema-validated document storage over pluggable backends.
//!
//! This crate provides:
//!
//! - **Collection definitions** ([`schema`]) - Named schemas made of ordered field specs
//! - **Collection registry** ([`registry`]) - Create, read, update, delete and name lookup of collections
//! - **Document store** ([`document`]) - Schema-checked CRUD of documents within a collection
//! - **Validation** ([`validation`]) - Required-field checks applied on every document write
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Query and filtering API** ([`query`]) - Filter expressions backends translate or evaluate
//! - **Records** ([`record`], [`record_set`], [`store`]) - Typed access to a backend's namespaces
//! - **Error handling** ([`error`]) - Error and result types with a coarse [`error::ErrorKind`]
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use headlessdb_core::{
//!     document::DocumentStore,
//!     registry::{CollectionLocator, CollectionRegistry},
//!     schema::{FieldSpec, NewCollection},
//!     store::Storage,
//! };
//!
//! let registry = Arc::new(CollectionRegistry::new(Storage::new(backend.clone())));
//! let documents = DocumentStore::new(Storage::new(backend), registry.clone());
//!
//! let books = registry
//!     .create(NewCollection::new("books", vec![FieldSpec::new("title", "String").required()]))
//!     .await?;
//! let data = serde_json::json!({ "title": "Dune" }).as_object().cloned().unwrap_or_default();
//! documents.create(&CollectionLocator::Id(books.id), data).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as headlessdb_core;

pub mod backend;
pub mod document;
pub mod error;
pub mod query;
pub mod record;
pub mod record_set;
pub mod registry;
pub mod schema;
pub mod store;
pub mod validation;
