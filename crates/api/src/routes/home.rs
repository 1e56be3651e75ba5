//! Liveness route.

use axum::Json;
use serde::Serialize;

/// Liveness response body.
#[derive(Debug, Serialize)]
pub struct Liveness {
    pub message: &'static str,
}

/// Returns a fixed message while the server is running. Does not check the
/// document store.
pub async fn home() -> Json<Liveness> {
    Json(Liveness {
        message: "Shop API running",
    })
}
