//! Stored document representation.
//!
//! A [`RawDocument`] is what the document store hands back: a map from field
//! name to a [`RawValue`], including the store-assigned `_id`. Values are a
//! small closed set of primitives so that every read in [`crate::mapper`] has
//! to say which variants it accepts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Field name under which the store keeps a document's identifier.
pub const ID_FIELD: &str = "_id";

/// A single stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Store-assigned identifier in its textual form.
    Id(String),
    Timestamp(DateTime<Utc>),
    List(Vec<RawValue>),
    Map(RawDocument),
}

impl RawValue {
    /// Short name of the variant, used in mapping errors.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Id(_) => "id",
            Self::Timestamp(_) => "timestamp",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<RawDocument> for RawValue {
    fn from(value: RawDocument) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for RawValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

/// A loosely typed stored record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    fields: BTreeMap<String, RawValue>,
}

impl RawDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Look up a field. Absent fields and explicit nulls are distinct here.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<RawValue> {
        self.fields.remove(field)
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for RawDocument {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RawDocument {
    type Item = (String, RawValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, RawValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

// BSON support (with mongodb feature)
#[cfg(feature = "mongodb")]
mod bson_support {
    use bson::{Bson, Document, oid::ObjectId, spec::ElementType};

    use super::{RawDocument, RawValue};

    /// A stored BSON value has no [`RawValue`] counterpart.
    #[derive(Debug, Clone, thiserror::Error)]
    #[error("unsupported BSON {element_type:?} value at `{path}`")]
    pub struct UnsupportedBson {
        /// Dotted path of the offending value.
        pub path: String,
        /// BSON type that could not be converted.
        pub element_type: ElementType,
    }

    fn convert(value: Bson, path: &str) -> Result<RawValue, UnsupportedBson> {
        Ok(match value {
            Bson::Null | Bson::Undefined => RawValue::Null,
            Bson::Boolean(b) => RawValue::Bool(b),
            Bson::Int32(i) => RawValue::Int(i64::from(i)),
            Bson::Int64(i) => RawValue::Int(i),
            Bson::Double(f) => RawValue::Float(f),
            Bson::String(s) => RawValue::Text(s),
            Bson::ObjectId(oid) => RawValue::Id(oid.to_hex()),
            Bson::DateTime(dt) => RawValue::Timestamp(dt.to_chrono()),
            Bson::Array(items) => RawValue::List(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| convert(item, &format!("{path}.{i}")))
                    .collect::<Result<_, _>>()?,
            ),
            Bson::Document(doc) => RawValue::Map(convert_document(doc, path)?),
            other => {
                return Err(UnsupportedBson {
                    path: path.to_owned(),
                    element_type: other.element_type(),
                });
            }
        })
    }

    fn convert_document(doc: Document, prefix: &str) -> Result<RawDocument, UnsupportedBson> {
        doc.into_iter()
            .map(|(key, value)| {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                convert(value, &path).map(|v| (key, v))
            })
            .collect()
    }

    impl TryFrom<Bson> for RawValue {
        type Error = UnsupportedBson;

        fn try_from(value: Bson) -> Result<Self, Self::Error> {
            convert(value, "")
        }
    }

    impl TryFrom<Document> for RawDocument {
        type Error = UnsupportedBson;

        fn try_from(doc: Document) -> Result<Self, Self::Error> {
            convert_document(doc, "")
        }
    }

    impl From<RawValue> for Bson {
        fn from(value: RawValue) -> Self {
            match value {
                RawValue::Null => Self::Null,
                RawValue::Bool(b) => Self::Boolean(b),
                RawValue::Int(i) => Self::Int64(i),
                RawValue::Float(f) => Self::Double(f),
                RawValue::Text(s) => Self::String(s),
                RawValue::Id(id) => {
                    ObjectId::parse_str(&id).map_or(Self::String(id), Self::ObjectId)
                }
                RawValue::Timestamp(dt) => Self::DateTime(bson::DateTime::from_chrono(dt)),
                RawValue::List(items) => Self::Array(items.into_iter().map(Into::into).collect()),
                RawValue::Map(doc) => Self::Document(doc.into()),
            }
        }
    }

    impl From<RawDocument> for Document {
        fn from(doc: RawDocument) -> Self {
            doc.into_iter().map(|(k, v)| (k, Bson::from(v))).collect()
        }
    }

}

#[cfg(feature = "mongodb")]
pub use bson_support::UnsupportedBson;
