//! In-process document store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tokio::sync::RwLock;

use shop_core::document::ID_FIELD;
use shop_core::{RawDocument, RawValue};

use super::{DocumentStore, Filter, StoreError, stamp_timestamps};

/// Document store kept in process memory.
///
/// Identifiers are `ObjectId` hex strings, like the ones MongoDB assigns.
/// Documents are returned in insertion order.
#[derive(Debug)]
pub struct InMemoryStore {
    name: String,
    collections: RwLock<BTreeMap<String, Vec<RawDocument>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn database_name(&self) -> &str {
        &self.name
    }

    async fn insert(&self, collection: &str, document: RawDocument) -> Result<String, StoreError> {
        let id = ObjectId::new().to_hex();
        let mut document = document;
        document.insert(ID_FIELD, RawValue::Id(id.clone()));
        stamp_timestamps(&mut document, Utc::now());

        self.collections
            .write()
            .await
            .entry(collection.to_owned())
            .or_default()
            .push(document);

        Ok(id)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<RawDocument>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.collections.read().await.keys().cloned().collect())
    }
}
