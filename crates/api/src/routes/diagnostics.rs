//! Store diagnostics route.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::state::AppState;

/// At most this many collection names are reported.
pub const MAX_REPORTED_COLLECTIONS: usize = 10;

/// Store error messages are cut to this many characters.
pub const MAX_ERROR_CHARS: usize = 50;

/// Overall state of the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseStatus {
    /// No store was configured at startup.
    NotConfigured,
    /// The store answered a collection listing.
    Connected,
    /// A store is configured but the collection listing failed.
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    NotConnected,
}

/// Whether a configuration variable was provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvPresence {
    Set,
    NotSet,
}

impl EnvPresence {
    const fn of<T>(value: Option<&T>) -> Self {
        if value.is_some() { Self::Set } else { Self::NotSet }
    }
}

/// Diagnostic report returned by `GET /test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub backend: String,
    pub database: DatabaseStatus,
    pub connection_status: ConnectionStatus,
    /// Name of the database in use, when configured.
    pub store_name: Option<String>,
    /// Presence of `DATABASE_URL`.
    pub database_url: EnvPresence,
    /// Presence of `DATABASE_NAME`.
    pub database_name: EnvPresence,
    pub collections: Vec<String>,
    /// Truncated store error, when degraded.
    pub error: Option<String>,
}

/// Report store configuration and connectivity. Never fails.
#[instrument(skip(state))]
pub async fn test_database(State(state): State<AppState>) -> Json<Diagnostics> {
    let config = state.config();
    let mut report = Diagnostics {
        backend: "running".to_string(),
        database: DatabaseStatus::NotConfigured,
        connection_status: ConnectionStatus::NotConnected,
        store_name: None,
        database_url: EnvPresence::of(config.database_url.as_ref()),
        database_name: EnvPresence::of(config.database_name.as_ref()),
        collections: Vec::new(),
        error: None,
    };

    let Some(store) = state.store() else {
        return Json(report);
    };

    report.connection_status = ConnectionStatus::Connected;
    report.store_name = Some(store.database_name().to_string());

    match store.collection_names().await {
        Ok(mut names) => {
            names.truncate(MAX_REPORTED_COLLECTIONS);
            report.collections = names;
            report.database = DatabaseStatus::Connected;
        }
        Err(err) => {
            warn!(error = %err, "Store diagnostics failed");
            report.database = DatabaseStatus::Degraded;
            report.error = Some(truncate_chars(&err.to_string(), MAX_ERROR_CHARS));
        }
    }

    Json(report)
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 50), "short");
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_value(DatabaseStatus::NotConfigured).ok(),
            Some(serde_json::json!("not_configured"))
        );
        assert_eq!(
            serde_json::to_value(EnvPresence::NotSet).ok(),
            Some(serde_json::json!("not_set"))
        );
    }
}
