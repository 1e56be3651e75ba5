//! Conversion from stored documents to output records.
//!
//! Every read names its field and says whether it is required or what its
//! default is. A missing or mistyped required field is a [`MappingError`];
//! nothing is silently filled with nulls.

use serde::{Deserialize, Serialize};

use crate::document::{ID_FIELD, RawDocument, RawValue};
use crate::schema::order::DEFAULT_ORDER_STATUS;
use crate::schema::OrderItem;
use crate::types::{OrderId, ProductId};

/// A stored document could not be mapped to an output record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// A required field is absent or null.
    #[error("malformed document: missing required field `{field}`")]
    Missing { field: String },
    /// A field holds a value of the wrong type.
    #[error("malformed document: field `{field}` expected {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Product as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOut {
    pub id: ProductId,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub image: Option<String>,
    pub in_stock: bool,
}

/// Order as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderOut {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub shipping_address: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: String,
}

/// Map a stored product document.
///
/// # Errors
///
/// Returns [`MappingError`] if `_id`, `title`, `price` or `category` is
/// missing, or if any present field has the wrong type.
pub fn to_product_out(doc: &RawDocument) -> Result<ProductOut, MappingError> {
    let fields = Reader::new(doc);
    Ok(ProductOut {
        id: ProductId::new(fields.id()?),
        title: fields.text("title")?,
        description: fields.optional_text("description")?,
        price: fields.number("price")?,
        category: fields.text("category")?,
        image: fields.optional_text("image")?,
        in_stock: fields.flag_or("in_stock", true)?,
    })
}

/// Map a stored order document.
///
/// Items are carried through in stored order. They are read structurally but
/// their constraints are not re-checked.
///
/// # Errors
///
/// Returns [`MappingError`] if `_id` or a customer field is missing, or if
/// any present field (including inside an item) has the wrong type.
pub fn to_order_out(doc: &RawDocument) -> Result<OrderOut, MappingError> {
    let fields = Reader::new(doc);
    let items = fields
        .list_or_empty("items")?
        .iter()
        .enumerate()
        .map(|(i, value)| fields.item(i, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OrderOut {
        id: OrderId::new(fields.id()?),
        customer_name: fields.text("customer_name")?,
        customer_email: fields.text("customer_email")?,
        shipping_address: fields.text("shipping_address")?,
        items,
        subtotal: fields.number_or("subtotal", 0.0)?,
        tax: fields.number_or("tax", 0.0)?,
        total: fields.number_or("total", 0.0)?,
        status: fields.text_or("status", DEFAULT_ORDER_STATUS)?,
    })
}

struct Reader<'a> {
    doc: &'a RawDocument,
    prefix: String,
}

impl<'a> Reader<'a> {
    fn new(doc: &'a RawDocument) -> Self {
        Self {
            doc,
            prefix: String::new(),
        }
    }

    fn path(&self, field: &str) -> String {
        format!("{}{field}", self.prefix)
    }

    fn wrong_type(&self, field: &str, expected: &'static str, found: &RawValue) -> MappingError {
        MappingError::WrongType {
            field: self.path(field),
            expected,
            found: found.type_name(),
        }
    }

    fn optional(&self, field: &str) -> Option<&'a RawValue> {
        self.doc
            .get(field)
            .filter(|value| !matches!(value, RawValue::Null))
    }

    fn required(&self, field: &str) -> Result<&'a RawValue, MappingError> {
        self.optional(field).ok_or_else(|| MappingError::Missing {
            field: self.path(field),
        })
    }

    fn id(&self) -> Result<String, MappingError> {
        match self.required(ID_FIELD)? {
            RawValue::Id(id) | RawValue::Text(id) => Ok(id.clone()),
            RawValue::Int(n) => Ok(n.to_string()),
            other => Err(self.wrong_type(ID_FIELD, "id", other)),
        }
    }

    fn as_text(&self, field: &str, value: &RawValue) -> Result<String, MappingError> {
        match value {
            RawValue::Text(s) => Ok(s.clone()),
            other => Err(self.wrong_type(field, "text", other)),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_number(&self, field: &str, value: &RawValue) -> Result<f64, MappingError> {
        match value {
            RawValue::Float(f) => Ok(*f),
            RawValue::Int(n) => Ok(*n as f64),
            other => Err(self.wrong_type(field, "number", other)),
        }
    }

    fn text(&self, field: &str) -> Result<String, MappingError> {
        self.as_text(field, self.required(field)?)
    }

    fn optional_text(&self, field: &str) -> Result<Option<String>, MappingError> {
        self.optional(field)
            .map(|value| self.as_text(field, value))
            .transpose()
    }

    fn text_or(&self, field: &str, default: &str) -> Result<String, MappingError> {
        self.optional_text(field)
            .map(|text| text.unwrap_or_else(|| default.to_owned()))
    }

    fn number(&self, field: &str) -> Result<f64, MappingError> {
        self.as_number(field, self.required(field)?)
    }

    fn number_or(&self, field: &str, default: f64) -> Result<f64, MappingError> {
        self.optional(field)
            .map_or(Ok(default), |value| self.as_number(field, value))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn integer(&self, field: &str) -> Result<i64, MappingError> {
        match self.required(field)? {
            RawValue::Int(n) => Ok(*n),
            RawValue::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
            other => Err(self.wrong_type(field, "integer", other)),
        }
    }

    fn flag_or(&self, field: &str, default: bool) -> Result<bool, MappingError> {
        match self.optional(field) {
            None => Ok(default),
            Some(RawValue::Bool(b)) => Ok(*b),
            Some(other) => Err(self.wrong_type(field, "bool", other)),
        }
    }

    fn list_or_empty(&self, field: &str) -> Result<&'a [RawValue], MappingError> {
        match self.optional(field) {
            None => Ok(&[]),
            Some(RawValue::List(items)) => Ok(items),
            Some(other) => Err(self.wrong_type(field, "list", other)),
        }
    }

    fn item(&self, index: usize, value: &RawValue) -> Result<OrderItem, MappingError> {
        let field = format!("items[{index}]");
        let RawValue::Map(doc) = value else {
            return Err(self.wrong_type(&field, "map", value));
        };
        let item = Reader {
            doc,
            prefix: format!("{}.", self.path(&field)),
        };
        Ok(OrderItem {
            product_id: item.text("product_id")?,
            title: item.text("title")?,
            price: item.number("price")?,
            quantity: item.integer("quantity")?,
            image: item.optional_text("image")?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{Order, Product, Schema};

    fn stored(mut doc: RawDocument, id: &str) -> RawDocument {
        doc.insert(ID_FIELD, RawValue::Id(id.to_string()));
        doc
    }

    #[test]
    fn test_product_round_trip_keeps_every_field() {
        let product = Product::validate(&json!({
            "title": "Desk Lamp",
            "description": "Warm light",
            "price": 25.5,
            "category": "lighting",
            "image": "https://cdn.example.com/lamp.png",
        }))
        .unwrap();

        let out = to_product_out(&stored(product.to_document(), "65f1c0ffee")).unwrap();

        assert_eq!(out.id.as_str(), "65f1c0ffee");
        assert_eq!(out.title, product.title);
        assert_eq!(out.description, product.description);
        assert!((out.price - product.price).abs() < f64::EPSILON);
        assert_eq!(out.category, product.category);
        assert_eq!(out.image, product.image);
        assert!(out.in_stock);
    }

    #[test]
    fn test_product_defaults_and_int_price() {
        let doc = RawDocument::new()
            .with(ID_FIELD, RawValue::Id("a1".to_string()))
            .with("title", "Mug")
            .with("price", 12_i64)
            .with("category", "kitchen");

        let out = to_product_out(&doc).unwrap();
        assert!((out.price - 12.0).abs() < f64::EPSILON);
        assert!(out.in_stock);
        assert_eq!(out.description, None);
    }

    #[test]
    fn test_product_missing_required_field() {
        let doc = RawDocument::new()
            .with(ID_FIELD, RawValue::Id("a1".to_string()))
            .with("title", "Mug")
            .with("category", "kitchen");

        assert_eq!(
            to_product_out(&doc).unwrap_err(),
            MappingError::Missing {
                field: "price".to_string()
            }
        );
    }

    #[test]
    fn test_product_wrong_type() {
        let doc = RawDocument::new()
            .with(ID_FIELD, RawValue::Id("a1".to_string()))
            .with("title", "Mug")
            .with("price", "12")
            .with("category", "kitchen");

        assert_eq!(
            to_product_out(&doc).unwrap_err(),
            MappingError::WrongType {
                field: "price".to_string(),
                expected: "number",
                found: "text",
            }
        );
    }

    #[test]
    fn test_missing_id() {
        let doc = RawDocument::new()
            .with("title", "Mug")
            .with("price", 1.0)
            .with("category", "kitchen");
        assert!(matches!(
            to_product_out(&doc),
            Err(MappingError::Missing { field }) if field == "_id"
        ));
    }

    #[test]
    fn test_order_round_trip() {
        let order = Order::validate(&json!({
            "customer_name": "Ada",
            "customer_email": "ada@example.com",
            "shipping_address": "12 Analytical Way",
            "items": [
                { "product_id": "p1", "title": "Lamp", "price": 20, "quantity": 2 },
                { "product_id": "p2", "title": "Bulb", "price": 2.5, "quantity": 4 },
            ],
            "subtotal": 50,
            "tax": 4,
            "total": 54,
            "status": "shipped",
        }))
        .unwrap();

        let out = to_order_out(&stored(order.to_document(), "o1")).unwrap();

        assert_eq!(out.id.as_str(), "o1");
        assert_eq!(out.customer_email, "ada@example.com");
        assert_eq!(out.items, order.items);
        assert!((out.tax - 4.0).abs() < f64::EPSILON);
        assert_eq!(out.status, "shipped");
    }

    #[test]
    fn test_order_defaults() {
        let doc = RawDocument::new()
            .with(ID_FIELD, RawValue::Id("o2".to_string()))
            .with("customer_name", "Ada")
            .with("customer_email", "ada@example.com")
            .with("shipping_address", "12 Analytical Way");

        let out = to_order_out(&doc).unwrap();
        assert!(out.items.is_empty());
        assert!(out.subtotal.abs() < f64::EPSILON);
        assert!(out.tax.abs() < f64::EPSILON);
        assert!(out.total.abs() < f64::EPSILON);
        assert_eq!(out.status, "pending");
    }

    #[test]
    fn test_order_items_not_revalidated() {
        let item = RawDocument::new()
            .with("product_id", "p1")
            .with("title", "Lamp")
            .with("price", 20_i64)
            .with("quantity", 0_i64);
        let doc = RawDocument::new()
            .with(ID_FIELD, RawValue::Id("o3".to_string()))
            .with("customer_name", "Ada")
            .with("customer_email", "not-an-email")
            .with("shipping_address", "12 Analytical Way")
            .with("items", vec![RawValue::Map(item)]);

        let out = to_order_out(&doc).unwrap();
        assert_eq!(out.items[0].quantity, 0);
        assert_eq!(out.customer_email, "not-an-email");
    }

    #[test]
    fn test_malformed_item_reports_path() {
        let item = RawDocument::new()
            .with("product_id", "p1")
            .with("price", 20_i64)
            .with("quantity", 1_i64);
        let doc = RawDocument::new()
            .with(ID_FIELD, RawValue::Id("o4".to_string()))
            .with("customer_name", "Ada")
            .with("customer_email", "ada@example.com")
            .with("shipping_address", "12 Analytical Way")
            .with("items", vec![RawValue::Map(item)]);

        assert_eq!(
            to_order_out(&doc).unwrap_err(),
            MappingError::Missing {
                field: "items[0].title".to_string()
            }
        );
    }

    #[test]
    fn test_output_serializes_id_as_string() {
        let doc = RawDocument::new()
            .with(ID_FIELD, RawValue::Id("65f1".to_string()))
            .with("title", "Mug")
            .with("price", 3.0)
            .with("category", "kitchen");
        let json = serde_json::to_value(to_product_out(&doc).unwrap()).unwrap();
        assert_eq!(json["id"], "65f1");
        assert_eq!(json["in_stock"], true);
        assert_eq!(json["description"], serde_json::Value::Null);
    }
}
