//! Application state shared across handlers.

use std::sync::Arc;

use shop_core::{CollectionRegistry, RegistryError, Schema};

use crate::config::ShopConfig;
use crate::db::DocumentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The document store is injected
/// rather than global, so tests can substitute an in-memory one. `None`
/// means no store was configured.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopConfig,
    store: Option<Arc<dyn DocumentStore>>,
    collections: CollectionRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `store` - Document store, or `None` if not configured
    ///
    /// # Errors
    ///
    /// Returns an error if the record kind to collection table is invalid.
    pub fn new(
        config: ShopConfig,
        store: Option<Arc<dyn DocumentStore>>,
    ) -> Result<Self, RegistryError> {
        let collections = CollectionRegistry::new()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                collections,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    /// Get the document store, if one is configured.
    #[must_use]
    pub fn store(&self) -> Option<&dyn DocumentStore> {
        self.inner.store.as_deref()
    }

    /// Get a reference to the collection table.
    #[must_use]
    pub fn collections(&self) -> &CollectionRegistry {
        &self.inner.collections
    }

    /// Collection name for records of schema `S`.
    ///
    /// # Errors
    ///
    /// Returns an error if `S` is not a stored record kind.
    pub fn collection_for<S: Schema>(&self) -> Result<&'static str, RegistryError> {
        self.inner.collections.collection_for::<S>()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field(
                "store",
                &self.inner.store.as_ref().map(|store| store.database_name()),
            )
            .field("collections", &self.inner.collections)
            .finish()
    }
}
