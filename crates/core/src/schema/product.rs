//! Product schema.

use serde::{Deserialize, Serialize};

use super::fields::Fields;
use super::{RecordKind, Schema, ValidationError};
use crate::document::RawDocument;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product title, never blank.
    pub title: String,
    pub description: Option<String>,
    /// Price in dollars, never negative.
    pub price: f64,
    pub category: String,
    /// Product image URL.
    pub image: Option<String>,
    /// Defaults to `true`.
    pub in_stock: bool,
}

impl Schema for Product {
    const KIND: RecordKind = RecordKind::Product;

    fn validate(input: &serde_json::Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(input);

        let title = fields.non_empty_text("title");
        let description = fields.optional_text("description");
        let price = fields.number("price", 0.0);
        let category = fields.text("category");
        let image = fields.optional_text("image");
        let in_stock = fields.flag_or("in_stock", true);

        let record = match (title, price, category, in_stock) {
            (Some(title), Some(price), Some(category), Some(in_stock)) => Some(Self {
                title,
                description,
                price,
                category,
                image,
                in_stock,
            }),
            _ => None,
        };
        fields.build(record)
    }

    fn to_document(&self) -> RawDocument {
        RawDocument::new()
            .with("title", self.title.as_str())
            .with("description", self.description.clone())
            .with("price", self.price)
            .with("category", self.category.as_str())
            .with("image", self.image.clone())
            .with("in_stock", self.in_stock)
    }
}
