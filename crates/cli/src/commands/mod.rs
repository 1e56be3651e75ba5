//! CLI command implementations.

pub mod inspect;
pub mod seed;

use shop_api::config::ShopConfig;
use shop_api::db::MongoStore;

/// Connect to the store named by the environment.
///
/// # Errors
///
/// Returns an error if a store variable is missing or the connection
/// string is invalid.
pub async fn connect() -> Result<MongoStore, Box<dyn std::error::Error>> {
    let config = ShopConfig::from_env()?;
    let settings = config.require_store()?;
    let store = MongoStore::connect(settings).await?;
    tracing::info!(database = settings.database, "Connected to MongoDB");
    Ok(store)
}
