//! Order and order line schemas.
//!
//! Order lines are snapshots: title, price and image are copied from the
//! product at purchase time and `product_id` is carried as plain text, not
//! checked against the product collection.

use serde::{Deserialize, Serialize};

use super::fields::Fields;
use super::{RecordKind, Schema, ValidationError};
use crate::document::{RawDocument, RawValue};
use crate::types::Email;

/// Default status for a newly placed order.
pub const DEFAULT_ORDER_STATUS: &str = "pending";

/// A single line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    /// Product title at time of purchase.
    pub title: String,
    /// Unit price at time of purchase.
    pub price: f64,
    /// At least 1 when validated.
    pub quantity: i64,
    /// Image URL snapshot.
    pub image: Option<String>,
}

impl OrderItem {
    fn read(fields: &mut Fields<'_>) -> Option<Self> {
        let product_id = fields.text("product_id");
        let title = fields.text("title");
        let price = fields.number("price", 0.0);
        let quantity = fields.integer("quantity", 1);
        let image = fields.optional_text("image");

        Some(Self {
            product_id: product_id?,
            title: title?,
            price: price?,
            quantity: quantity?,
            image,
        })
    }
}

impl Schema for OrderItem {
    const KIND: RecordKind = RecordKind::OrderItem;

    fn validate(input: &serde_json::Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(input);
        let record = Self::read(&mut fields);
        fields.build(record)
    }

    fn to_document(&self) -> RawDocument {
        RawDocument::new()
            .with("product_id", self.product_id.as_str())
            .with("title", self.title.as_str())
            .with("price", self.price)
            .with("quantity", self.quantity)
            .with("image", self.image.clone())
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub customer_name: String,
    pub customer_email: Email,
    pub shipping_address: String,
    /// Lines in the order they were submitted. May be empty.
    pub items: Vec<OrderItem>,
    /// Subtotal before tax/shipping.
    pub subtotal: f64,
    /// Defaults to 0.
    pub tax: f64,
    pub total: f64,
    /// Free-form status, defaults to [`DEFAULT_ORDER_STATUS`].
    pub status: String,
}

impl Order {
    fn read(fields: &mut Fields<'_>) -> Option<Self> {
        let customer_name = fields.text("customer_name");
        let customer_email = fields.email("customer_email");
        let shipping_address = fields.text("shipping_address");

        let items = fields.list("items").map(|values| {
            values
                .iter()
                .enumerate()
                .filter_map(|(i, value)| {
                    let path = fields.path(&format!("items[{i}]"));
                    let mut item_fields = Fields::nested(value, &path);
                    let item = OrderItem::read(&mut item_fields);
                    fields.absorb(item_fields);
                    item
                })
                .collect::<Vec<_>>()
        });

        let subtotal = fields.number("subtotal", 0.0);
        let tax = fields.number_or("tax", 0.0, 0.0);
        let total = fields.number("total", 0.0);
        let status = fields.text_or("status", DEFAULT_ORDER_STATUS);

        Some(Self {
            customer_name: customer_name?,
            customer_email: customer_email?,
            shipping_address: shipping_address?,
            items: items?,
            subtotal: subtotal?,
            tax: tax?,
            total: total?,
            status: status?,
        })
    }
}

impl Schema for Order {
    const KIND: RecordKind = RecordKind::Order;

    fn validate(input: &serde_json::Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(input);
        let record = Self::read(&mut fields);
        fields.build(record)
    }

    fn to_document(&self) -> RawDocument {
        let items: Vec<RawValue> = self
            .items
            .iter()
            .map(|item| RawValue::Map(item.to_document()))
            .collect();

        RawDocument::new()
            .with("customer_name", self.customer_name.as_str())
            .with("customer_email", self.customer_email.as_str())
            .with("shipping_address", self.shipping_address.as_str())
            .with("items", items)
            .with("subtotal", self.subtotal)
            .with("tax", self.tax)
            .with("total", self.total)
            .with("status", self.status.as_str())
    }
}
