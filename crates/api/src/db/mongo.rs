//! MongoDB-backed document store.

use std::time::Duration;

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use secrecy::ExposeSecret;

use shop_core::RawDocument;
use shop_core::document::ID_FIELD;

use super::{Condition, DocumentStore, Filter, StoreError, stamp_timestamps};
use crate::config::StoreSettings;

/// How long the driver waits for a usable server before giving up.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Document store backed by a MongoDB database.
///
/// Cheap to clone; the database handle shares the driver's connection pool.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Create a client for the configured database.
    ///
    /// The driver connects lazily, so an unreachable server is only noticed
    /// by the first operation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the connection string cannot be parsed.
    pub async fn connect(settings: StoreSettings<'_>) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(settings.url.expose_secret()).await?;
        options.app_name = Some("shop-api".to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options)?;
        let database = client.database(settings.database);

        Ok(Self { database })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn database_name(&self) -> &str {
        self.database.name()
    }

    async fn insert(&self, collection: &str, document: RawDocument) -> Result<String, StoreError> {
        let mut document = document;
        document.remove(ID_FIELD);
        stamp_timestamps(&mut document, Utc::now());

        let result = self
            .database
            .collection::<Document>(collection)
            .insert_one(Document::from(document))
            .await?;

        Ok(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(id) => id,
            other => other.to_string(),
        })
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<RawDocument>, StoreError> {
        let documents: Vec<Document> = self
            .database
            .collection::<Document>(collection)
            .find(to_query(filter))
            .await?
            .try_collect()
            .await?;

        Ok(documents
            .into_iter()
            .filter_map(|document| match RawDocument::try_from(document) {
                Ok(raw) => Some(raw),
                Err(err) => {
                    tracing::warn!(collection, error = %err, "Skipping undecodable document");
                    None
                }
            })
            .collect())
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.database.list_collection_names().await?)
    }
}

/// Translate a [`Filter`] into a MongoDB query document.
///
/// Substring needles are regex-escaped so user input is matched literally.
fn to_query(filter: &Filter) -> Document {
    let mut clauses: Vec<Document> = filter
        .conditions()
        .iter()
        .map(|condition| match condition {
            Condition::Equals { field, value } => doc! { field.as_str(): value.as_str() },
            Condition::ContainsIgnoreCase { field, needle } => doc! {
                field.as_str(): { "$regex": regex::escape(needle), "$options": "i" }
            },
        })
        .collect();

    match clauses.len() {
        0 => Document::new(),
        1 => clauses.pop().unwrap_or_default(),
        _ => doc! { "$and": clauses },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_is_empty_query() {
        assert_eq!(to_query(&Filter::new()), Document::new());
    }

    #[test]
    fn test_single_condition_query() {
        let query = to_query(&Filter::new().equals("category", "electronics"));
        assert_eq!(query, doc! { "category": "electronics" });
    }

    #[test]
    fn test_contains_query_escapes_regex() {
        let query = to_query(&Filter::new().contains_ignore_case("title", "lamp (x2)"));
        assert_eq!(
            query,
            doc! { "title": { "$regex": "lamp \\(x2\\)", "$options": "i" } }
        );
    }

    #[test]
    fn test_multiple_conditions_use_and() {
        let query = to_query(
            &Filter::new()
                .equals("category", "lighting")
                .contains_ignore_case("title", "lamp"),
        );
        assert_eq!(
            query,
            doc! { "$and": [
                { "category": "lighting" },
                { "title": { "$regex": "lamp", "$options": "i" } },
            ] }
        );
    }
}
