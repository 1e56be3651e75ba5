//! Product route handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use shop_core::{Product, ProductId, ProductOut, Schema, to_product_out};

use super::{insert_record, list_records};
use crate::db::Filter;
use crate::error::Result;
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring of the title.
    pub q: Option<String>,
}

impl ProductQuery {
    /// Build the store filter. Empty parameters are ignored.
    #[must_use]
    pub fn filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            filter = filter.equals("category", category);
        }
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            filter = filter.contains_ignore_case("title", q);
        }
        filter
    }
}

/// List products, optionally filtered by category and title search.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductOut>>> {
    let products = list_records::<Product, _>(&state, &query.filter(), to_product_out).await?;
    Ok(Json(products))
}

/// Create a product and return its id.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProductId>> {
    let Json(payload) = payload?;
    let product = Product::validate(&payload)?;
    let id = insert_record(&state, &product).await?;
    Ok(Json(ProductId::new(id)))
}

#[cfg(test)]
mod tests {
    use crate::db::Condition;

    use super::*;

    #[test]
    fn test_empty_query_has_no_conditions() {
        assert!(ProductQuery::default().filter().conditions().is_empty());

        let query = ProductQuery {
            category: Some(String::new()),
            q: Some(String::new()),
        };
        assert!(query.filter().conditions().is_empty());
    }

    #[test]
    fn test_query_builds_both_conditions() {
        let query = ProductQuery {
            category: Some("electronics".to_string()),
            q: Some("lamp".to_string()),
        };
        assert_eq!(
            query.filter().conditions(),
            [
                Condition::Equals {
                    field: "category".to_string(),
                    value: "electronics".to_string(),
                },
                Condition::ContainsIgnoreCase {
                    field: "title".to_string(),
                    needle: "lamp".to_string(),
                },
            ]
        );
    }
}
