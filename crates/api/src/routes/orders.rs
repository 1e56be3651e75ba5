//! Order route handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;
use tracing::instrument;

use shop_core::{Order, OrderId, OrderOut, Schema, to_order_out};

use super::{insert_record, list_records};
use crate::db::Filter;
use crate::error::Result;
use crate::state::AppState;

/// List every order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<OrderOut>>> {
    let orders = list_records::<Order, _>(&state, &Filter::new(), to_order_out).await?;
    Ok(Json(orders))
}

/// Create an order and return its id.
///
/// An order with no items is accepted.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<OrderId>> {
    let Json(payload) = payload?;
    let order = Order::validate(&payload)?;
    let id = insert_record(&state, &order).await?;
    Ok(Json(OrderId::new(id)))
}
