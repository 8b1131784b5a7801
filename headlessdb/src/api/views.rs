//! Response bodies. Stored records carry `id`; clients see `_id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use headlessdb_core::{
    document::{Document, DocumentData},
    error::StoreError,
    schema::{Collection, FieldSpec},
};

/// Keys [`flat_document`] writes next to the data keys.
pub const FLAT_RESERVED_KEYS: [&str; 2] = ["_id", "_collection"];

#[derive(Debug, Clone, Serialize)]
pub struct CollectionView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl From<Collection> for CollectionView {
    fn from(collection: Collection) -> Self {
        Self {
            id: collection.id,
            name: collection.name,
            fields: collection.fields,
        }
    }
}

/// Rejects data that could not be rendered flat without losing a key.
pub fn check_flat_keys(data: &DocumentData) -> Result<(), StoreError> {
    match FLAT_RESERVED_KEYS.iter().find(|key| data.contains_key(**key)) {
        Some(key) => Err(StoreError::InvalidInput(format!("'{key}' is a reserved key"))),
        None => Ok(()),
    }
}

/// A document with its data keys at the top level, next to `_id` and
/// `_collection`. Documents written through the name routes may still carry
/// those keys in their data; the IDs win.
pub fn flat_document(document: Document) -> Value {
    let mut body = document.data;
    body.insert("_id".to_string(), Value::String(document.id.to_string()));
    body.insert("_collection".to_string(), Value::String(document.collection_ref.to_string()));

    Value::Object(body)
}

/// A document with its data nested under `data`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopedDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub collection_ref: Uuid,
    pub data: DocumentData,
}

impl From<Document> for EnvelopedDocument {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            collection_ref: document.collection_ref,
            data: document.data,
        }
    }
}

/// Request body of the name-addressed create route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopedData {
    #[serde(default)]
    pub data: DocumentData,
}
