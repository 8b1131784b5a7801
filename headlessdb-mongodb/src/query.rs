//! Translation of filter expressions into MongoDB query documents.

use bson::{Document, Bson, doc};

use headlessdb_core::{
    query::QueryVisitor,
    error::StoreError,
};

use crate::sanitizer::KeySanitizer;

/// Converts filter expressions into MongoDB's native query syntax.
///
/// Field names go through the same escaping as stored keys so that filters hit
/// the stored field.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = StoreError;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            KeySanitizer::sanitize_key(field): { "$eq": KeySanitizer::sanitize_value(value) },
        })
    }
}
