//! Document store access.
//!
//! Handlers never talk to a driver directly: they receive a
//! [`DocumentStore`] through the application state. Two implementations
//! exist:
//!
//! - [`MongoStore`] - MongoDB via the official driver
//! - [`InMemoryStore`] - process-local maps, used by tests and local runs
//!
//! # Collections
//!
//! One collection per stored record kind, named by
//! [`shop_core::CollectionRegistry`]. Documents carry the store-assigned
//! `_id`, the schema fields, and `created_at`/`updated_at` stamped on insert.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use shop_core::{RawDocument, RawValue};

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The driver reported an error.
    #[error("database error: {0}")]
    Database(#[source] mongodb::error::Error),

    /// A stored document could not be decoded.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *err.kind {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } => {
                Self::Unavailable(err.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

impl From<shop_core::document::UnsupportedBson> for StoreError {
    fn from(err: shop_core::document::UnsupportedBson) -> Self {
        Self::DataCorruption(err.to_string())
    }
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Text field equals the value exactly.
    Equals { field: String, value: String },
    /// Text field contains the needle, ignoring case. The needle is literal.
    ContainsIgnoreCase { field: String, needle: String },
}

/// Conjunction of conditions. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn equals(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Equals {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn contains_ignore_case(
        mut self,
        field: impl Into<String>,
        needle: impl Into<String>,
    ) -> Self {
        self.conditions.push(Condition::ContainsIgnoreCase {
            field: field.into(),
            needle: needle.into(),
        });
        self
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate the filter against a document in memory.
    #[must_use]
    pub fn matches(&self, doc: &RawDocument) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Equals { field, value } => {
                matches!(doc.get(field), Some(RawValue::Text(text)) if text == value)
            }
            Condition::ContainsIgnoreCase { field, needle } => {
                matches!(doc.get(field), Some(RawValue::Text(text))
                    if text.to_lowercase().contains(&needle.to_lowercase()))
            }
        })
    }
}

/// Collection-scoped create/find access to a document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the database backing this store.
    fn database_name(&self) -> &str;

    /// Insert a document and return its new identifier.
    ///
    /// Any `_id` in `document` is replaced by the store-assigned one.
    async fn insert(&self, collection: &str, document: RawDocument) -> Result<String, StoreError>;

    /// Find every document in `collection` matching `filter`.
    async fn find(&self, collection: &str, filter: &Filter)
    -> Result<Vec<RawDocument>, StoreError>;

    /// Names of the collections in the database.
    async fn collection_names(&self) -> Result<Vec<String>, StoreError>;
}

/// Stamp creation and update times onto a document about to be inserted.
pub fn stamp_timestamps(document: &mut RawDocument, now: DateTime<Utc>) {
    document.insert("created_at", now);
    document.insert("updated_at", now);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> RawDocument {
        RawDocument::new()
            .with("title", "Brass Desk LAMP")
            .with("category", "lighting")
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::new().matches(&lamp()));
        assert!(Filter::new().matches(&RawDocument::new()));
    }

    #[test]
    fn test_equals_is_exact() {
        assert!(Filter::new().equals("category", "lighting").matches(&lamp()));
        assert!(!Filter::new().equals("category", "Lighting").matches(&lamp()));
        assert!(!Filter::new().equals("category", "light").matches(&lamp()));
    }

    #[test]
    fn test_contains_ignores_case() {
        let filter = Filter::new().contains_ignore_case("title", "lamp");
        assert!(filter.matches(&lamp()));
        assert!(!filter.matches(&RawDocument::new().with("title", "Bulb")));
    }

    #[test]
    fn test_contains_is_literal() {
        let filter = Filter::new().contains_ignore_case("title", "l.mp");
        assert!(!filter.matches(&lamp()));
    }

    #[test]
    fn test_conditions_are_conjunctive() {
        let filter = Filter::new()
            .equals("category", "kitchen")
            .contains_ignore_case("title", "lamp");
        assert!(!filter.matches(&lamp()));
    }

    #[test]
    fn test_stamp_timestamps() {
        let now = Utc::now();
        let mut doc = lamp();
        stamp_timestamps(&mut doc, now);
        assert_eq!(doc.get("created_at"), Some(&RawValue::Timestamp(now)));
        assert_eq!(doc.get("updated_at"), Some(&RawValue::Timestamp(now)));
    }
}
