//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /          - Liveness message
//!
//! # Products
//! GET  /products  - Product listing (?category=exact&q=title-substring)
//! POST /products  - Create product, returns its id
//!
//! # Orders
//! GET  /orders    - Order listing
//! POST /orders    - Create order, returns its id
//!
//! # Diagnostics
//! GET  /test      - Store connectivity and collection names
//! ```
//!
//! # Store failure policy
//!
//! Listings degrade to an empty array when no store is configured or the
//! store cannot be reached. Creates fail with 500 in both cases.

pub mod diagnostics;
pub mod home;
pub mod orders;
pub mod products;

use axum::{Router, routing::get};
use tracing::{info, warn};

use shop_core::{MappingError, RawDocument, Schema};

use crate::db::{Filter, StoreError};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(products::index).post(products::create))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(orders::index).post(orders::create))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/test", get(diagnostics::test_database))
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
}

/// Insert an already validated record.
///
/// Returns the store-assigned identifier.
async fn insert_record<S: Schema>(state: &AppState, record: &S) -> Result<String> {
    let store = state.store().ok_or(AppError::StoreNotConfigured)?;
    let collection = state.collection_for::<S>()?;

    let id = store.insert(collection, record.to_document()).await?;
    info!(collection, id = %id, "Created document");
    Ok(id)
}

/// Find and map documents of schema `S`.
///
/// Documents that fail to map are skipped and logged.
async fn list_records<S: Schema, T>(
    state: &AppState,
    filter: &Filter,
    map: fn(&RawDocument) -> std::result::Result<T, MappingError>,
) -> Result<Vec<T>> {
    let Some(store) = state.store() else {
        return Ok(Vec::new());
    };
    let collection = state.collection_for::<S>()?;

    let documents = match store.find(collection, filter).await {
        Ok(documents) => documents,
        Err(StoreError::Unavailable(reason)) => {
            warn!(collection, %reason, "Store unreachable, returning empty listing");
            return Ok(Vec::new());
        }
        Err(err) => return Err(AppError::from(err)),
    };

    Ok(documents
        .iter()
        .filter_map(|doc| match map(doc) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(collection, error = %err, "Skipping malformed document");
                None
            }
        })
        .collect())
}
