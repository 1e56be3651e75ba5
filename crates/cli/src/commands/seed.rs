//! Seed the store from YAML files.
//!
//! Every entry is validated before anything is written: one bad entry
//! aborts the whole seed and each failure is reported with its position.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use shop_api::db::{DocumentStore, StoreError};
use shop_core::{CollectionRegistry, Product, RegistryError, Schema, ValidationError};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("{failed} of {total} entries failed validation, nothing inserted")]
    Invalid { failed: usize, total: usize },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Seed products from a YAML file into the configured store.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or the store rejects an insert.
pub async fn products(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let path = file.display().to_string();
    info!(path = %path, "Loading products");

    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| SeedError::Read {
            path: path.clone(),
            source,
        })?;
    let entries = parse_entries(&content).map_err(|source| SeedError::Parse {
        path: path.clone(),
        source,
    })?;
    let products = validate_products(&entries)?;
    info!(count = products.len(), "All entries valid");

    let store = super::connect().await?;
    let ids = insert_products(&store, &products).await?;
    info!(inserted = ids.len(), "Seeding complete");
    Ok(())
}

/// Parse a YAML sequence of payloads.
fn parse_entries(content: &str) -> Result<Vec<Value>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Validate every entry, logging each failure.
fn validate_products(entries: &[Value]) -> Result<Vec<Product>, SeedError> {
    let mut products = Vec::with_capacity(entries.len());
    let mut failures: Vec<(usize, ValidationError)> = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match Product::validate(entry) {
            Ok(product) => products.push(product),
            Err(err) => failures.push((index, err)),
        }
    }

    if failures.is_empty() {
        return Ok(products);
    }

    for (index, err) in &failures {
        error!(entry = index, "{err}");
    }
    Err(SeedError::Invalid {
        failed: failures.len(),
        total: entries.len(),
    })
}

/// Insert validated products, returning their new ids in order.
async fn insert_products(
    store: &dyn DocumentStore,
    products: &[Product],
) -> Result<Vec<String>, SeedError> {
    let collection = CollectionRegistry::new()?.collection_for::<Product>()?;

    let mut ids = Vec::with_capacity(products.len());
    for product in products {
        let id = store.insert(collection, product.to_document()).await?;
        info!(id = %id, title = %product.title, "Inserted product");
        ids.push(id);
    }
    Ok(ids)
}
