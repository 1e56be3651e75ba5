//! Read-only store checks.

use tracing::info;

use shop_api::db::DocumentStore;
use shop_core::CollectionRegistry;

/// Validate the collection table and log each entry.
///
/// # Errors
///
/// Returns an error if the table is incomplete or inconsistent.
pub fn collections() -> Result<(), Box<dyn std::error::Error>> {
    let registry = CollectionRegistry::new()?;
    for (kind, collection) in registry.iter() {
        info!(kind = %kind, collection, "Collection mapping");
    }
    Ok(())
}

/// Connect to the configured store and list its collections.
///
/// # Errors
///
/// Returns an error if the store is not configured or does not answer.
pub async fn ping() -> Result<(), Box<dyn std::error::Error>> {
    let store = super::connect().await?;
    let names = store.collection_names().await?;

    info!(
        database = store.database_name(),
        count = names.len(),
        "Store reachable"
    );
    for name in &names {
        info!("  - {name}");
    }
    Ok(())
}
