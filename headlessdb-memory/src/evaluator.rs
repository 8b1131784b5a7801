//! Filter evaluation for in-memory records.
//!
//! Records are matched by walking the filter expression against each stored
//! BSON document.

use std::collections::HashMap;
use bson::Bson;

use headlessdb_core::{
    query::{QueryVisitor, Expr},
    error::{StoreError, StoreResult},
};


/// Type-erased, comparable representation of BSON values.
///
/// Numeric types are normalized to f64 so `1` and `1.0` compare equal. UUIDs and
/// other binary values compare by subtype and bytes.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    Binary(u8, &'a [u8]),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Any other BSON type. Never equal to anything, itself included.
    Opaque,
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Binary(binary) => Comparable::Binary(u8::from(binary.subtype), &binary.bytes),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            _ => Comparable::Opaque,
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Binary(a_kind, a), Comparable::Binary(b_kind, b)) => a_kind == b_kind && a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}


/// Evaluates filter expressions against a single stored record.
///
/// A stored value that is not a BSON document matches nothing.
pub(crate) struct RecordEvaluator<'a> {
    record: &'a Bson,
}

impl<'a> RecordEvaluator<'a> {
    pub fn new(record: &'a Bson) -> Self {
        Self { record }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> StoreResult<bool> {
        self.visit_expr(expr)
    }

    /// Keeps the records matching `expr`, preserving their order.
    pub fn filter_records(
        records: impl IntoIterator<Item = &'a Bson>,
        expr: &Expr,
    ) -> StoreResult<Vec<Bson>> {
        let mut matched = Vec::new();

        for record in records {
            if RecordEvaluator::new(record).evaluate(expr)? {
                matched.push(record.clone());
            }
        }

        Ok(matched)
    }

    fn lookup(&self, field: &str) -> Option<&'a Bson> {
        self.record
            .as_document()
            .and_then(|doc| doc.get(field))
    }
}

impl<'a> QueryVisitor for RecordEvaluator<'a> {
    type Output = bool;
    type Error = StoreError;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(self
            .lookup(field)
            .is_some_and(|field_value| Comparable::from(field_value) == Comparable::from(value)))
    }
}
