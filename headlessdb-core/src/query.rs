//! Record filtering API for storage backends.
//!
//! The service only ever asks a backend for "every record in a namespace whose
//! field equals some value" (documents by collection, collections by name). This
//! module keeps that as a small expression type so each backend can translate it
//! into its own native form through a [`QueryVisitor`].
//!
//! ```ignore
//! use headlessdb_core::query::{Filter, Query};
//!
//! let query = Query::builder()
//!     .filter(Filter::eq("name", "books"))
//!     .build();
//! ```

use bson::Bson;

use crate::error::StoreError;

/// A filter expression for selecting records.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The top-level field equals the value exactly.
    Eq {
        field: String,
        value: Bson,
    },
}

/// A structured query for selecting records from a namespace.
///
/// A query without a filter selects every record.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Optional filter expression to match records.
    pub filter: Option<Expr>,
}

impl Query {
    /// Creates a query that matches every record.
    pub fn all() -> Self {
        Query { filter: None }
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }
}

/// Helper struct for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches records where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::Eq { field: field.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Sets the filter expression for this query.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

/// Walks an [`Expr`]. Backends implement this to evaluate or translate filters.
pub trait QueryVisitor {
    type Output;
    type Error: Into<StoreError>;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::Eq { field, value } => self.visit_eq(field, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_filter() {
        assert!(Query::all().filter.is_none());

        let query = Query::builder()
            .filter(Filter::eq("name", "books"))
            .build();

        assert_eq!(
            query.filter,
            Some(Expr::Eq { field: "name".to_string(), value: Bson::String("books".to_string()) }),
        );
    }
}
