use async_trait::async_trait;
use futures::{stream::iter, StreamExt, TryStreamExt};
use bson::{Document, Bson, Uuid, doc};
use mongodb::{
    Client, Collection as MongoCollection,
    options::ClientOptions,
};
use headlessdb_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{StoreError, StoreResult},
    query::{Query, QueryVisitor},
};

use crate::{sanitizer::KeySanitizer, query::MongoQueryTranslator};


/// MongoDB-backed record store. Each namespace maps to one MongoDB collection and
/// the record key is stored as `_id`.
///
/// Clones share the same client connection pool.
#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, namespace: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&KeySanitizer::sanitize_key(namespace))
    }

    fn prepare_record(&self, id: &Uuid, record: &Bson) -> StoreResult<Document> {
        let mut prepared = record
            .as_document()
            .map(KeySanitizer::sanitize_document)
            .ok_or_else(|| StoreError::Serialization("Expected a BSON document".into()))?;
        prepared.insert("_id", *id);

        Ok(prepared)
    }

    fn restore_record(&self, document: &Document) -> Bson {
        Bson::Document(KeySanitizer::restore_document(
            &document
                .iter()
                .filter(|(k, _)| k.as_str() != "_id")
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ))
    }

    async fn find(&self, filter: Document, namespace: &str) -> StoreResult<Vec<Bson>> {
        Ok(
            self.get_collection(namespace)
                .find(filter)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?
                .iter()
                .map(|doc| self.restore_record(doc))
                .collect()
        )
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_records(&self, records: Vec<(Uuid, Bson)>, namespace: &str) -> StoreResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        self.get_collection(namespace)
            .insert_many(
                records
                    .iter()
                    .map(|(id, record)| self.prepare_record(id, record))
                    .collect::<StoreResult<Vec<Document>>>()?,
            )
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn replace_records(&self, records: Vec<(Uuid, Bson)>, namespace: &str) -> StoreResult<()> {
        iter(records)
            .then(async |(id, record)| {
                let result = self.get_collection(namespace)
                    .replace_one(doc! { "_id": id }, self.prepare_record(&id, &record)?)
                    .await
                    .map_err(|e| StoreError::Backend(e.to_string()))?;

                if result.matched_count == 0 {
                    return Err(StoreError::RecordNotFound(id.to_string(), namespace.to_string()));
                }

                Ok(())
            })
            .try_collect::<Vec<_>>()
            .await?;

        Ok(())
    }

    async fn delete_records(&self, ids: Vec<Uuid>, namespace: &str) -> StoreResult<()> {
        iter(ids)
            .then(async |id| {
                let result = self.get_collection(namespace)
                    .delete_one(doc! { "_id": id })
                    .await
                    .map_err(|e| StoreError::Backend(e.to_string()))?;

                if result.deleted_count == 0 {
                    return Err(StoreError::RecordNotFound(id.to_string(), namespace.to_string()));
                }

                Ok(())
            })
            .try_collect::<Vec<_>>()
            .await?;

        Ok(())
    }

    async fn get_records(&self, ids: Vec<Uuid>, namespace: &str) -> StoreResult<Vec<Bson>> {
        self.find(doc! { "_id": { "$in": ids } }, namespace).await
    }

    async fn query_records(&self, query: Query, namespace: &str) -> StoreResult<Vec<Bson>> {
        let filter = match &query.filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr)?,
            None => doc! {},
        };

        self.find(filter, namespace).await
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| StoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| StoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
