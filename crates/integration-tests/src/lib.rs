//! Integration test harness for the shop API.
//!
//! Tests build the full router with [`shop_api::app`] and send requests
//! through `tower::ServiceExt::oneshot`, so no server or database is needed.
//!
//! # Test Categories
//!
//! - `products` - product listing, filtering and creation
//! - `orders` - order creation and listing
//! - `diagnostics` - liveness and `/test` store reporting

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use shop_api::config::ShopConfig;
use shop_api::db::{DocumentStore, Filter, InMemoryStore, StoreError};
use shop_api::state::AppState;
use shop_core::RawDocument;

/// How a [`FailingStore`] fails.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    /// The store cannot be reached.
    Unreachable,
    /// The store answers but returns undecodable data.
    Corrupt,
}

/// Store whose every operation fails.
#[derive(Debug)]
pub struct FailingStore(pub Failure);

impl FailingStore {
    fn error(&self) -> StoreError {
        match self.0 {
            Failure::Unreachable => StoreError::Unavailable(
                "Server selection timeout: No available servers. Topology: Unknown".to_string(),
            ),
            Failure::Corrupt => StoreError::DataCorruption("bad document".to_string()),
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    fn database_name(&self) -> &str {
        "broken"
    }

    async fn insert(
        &self,
        _collection: &str,
        _document: RawDocument,
    ) -> Result<String, StoreError> {
        Err(self.error())
    }

    async fn find(
        &self,
        _collection: &str,
        _filter: &Filter,
    ) -> Result<Vec<RawDocument>, StoreError> {
        Err(self.error())
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Err(self.error())
    }
}

/// A router plus a handle on the in-memory store behind it, if any.
pub struct TestApp {
    router: Router,
    pub store: Option<Arc<InMemoryStore>>,
}

impl TestApp {
    /// App backed by an empty in-memory store.
    #[must_use]
    pub fn with_memory_store() -> Self {
        let store = Arc::new(InMemoryStore::new("shop_test"));
        let state = build_state(
            &[
                ("DATABASE_URL", "mongodb://localhost:27017"),
                ("DATABASE_NAME", "shop_test"),
            ],
            Some(store.clone() as Arc<dyn DocumentStore>),
        );
        Self {
            router: shop_api::app(state),
            store: Some(store),
        }
    }

    /// App started without any store configuration.
    #[must_use]
    pub fn without_store() -> Self {
        Self {
            router: shop_api::app(build_state(&[], None)),
            store: None,
        }
    }

    /// App whose store fails every call.
    #[must_use]
    pub fn with_failing_store(failure: Failure) -> Self {
        let state = build_state(
            &[
                ("DATABASE_URL", "mongodb://db.invalid:27017"),
                ("DATABASE_NAME", "broken"),
            ],
            Some(Arc::new(FailingStore(failure)) as Arc<dyn DocumentStore>),
        );
        Self {
            router: shop_api::app(state),
            store: None,
        }
    }

    /// The in-memory store, for tests that seed documents directly.
    ///
    /// # Panics
    ///
    /// Panics if the app was not built with [`TestApp::with_memory_store`].
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn memory(&self) -> &InMemoryStore {
        self.store.as_deref().expect("app has no in-memory store")
    }

    /// Send a GET request and decode the JSON response.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty());
        self.send(request).await
    }

    /// Send a JSON POST request and decode the JSON response.
    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    /// Send a POST request with an arbitrary body labelled as JSON.
    pub async fn post_raw(&self, uri: &str, body: impl Into<String>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()));
        self.send(request).await
    }

    #[allow(clippy::unwrap_used)]
    async fn send(
        &self,
        request: Result<Request<Body>, axum::http::Error>,
    ) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request.unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

#[allow(clippy::unwrap_used)]
fn build_state(vars: &[(&str, &str)], store: Option<Arc<dyn DocumentStore>>) -> AppState {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    let config = ShopConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
    AppState::new(config, store).unwrap()
}
