//! Validation contracts for each record kind.
//!
//! Every schema validates a raw JSON payload into a fully populated record,
//! applying defaults for absent optional fields. Validation never stops at the
//! first problem: the returned [`ValidationError`] lists every offending field
//! together with the constraint it violated.

mod fields;
pub mod order;
pub mod product;
pub mod registry;
pub mod user;

use core::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::document::RawDocument;
use crate::types::EmailError;

pub use order::{Order, OrderItem};
pub use product::Product;
pub use registry::{CollectionRegistry, RegistryError};
pub use user::User;

/// Named category of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    User,
    Product,
    OrderItem,
    Order,
}

impl RecordKind {
    /// Every record kind, stored or embedded.
    pub const ALL: [Self; 4] = [Self::User, Self::Product, Self::OrderItem, Self::Order];

    /// Kinds that are only ever stored inside another record.
    #[must_use]
    pub const fn is_embedded(self) -> bool {
        matches!(self, Self::OrderItem)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Product => "Product",
            Self::OrderItem => "OrderItem",
            Self::Order => "Order",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated record kind.
pub trait Schema: Sized {
    /// The record kind this schema describes.
    const KIND: RecordKind;

    /// Validate a raw payload, applying defaults for absent optional fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every field that failed.
    fn validate(input: &serde_json::Value) -> Result<Self, ValidationError>;

    /// Convert the record into its stored form (without an identifier).
    fn to_document(&self) -> RawDocument;
}

/// The constraint a field violated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViolationKind {
    #[error("field required")]
    Missing,
    #[error("expected {expected}")]
    TypeMismatch { expected: &'static str },
    #[error("must be greater than or equal to {min}")]
    BelowMinimum { min: f64 },
    #[error("must be less than or equal to {max}")]
    AboveMaximum { max: f64 },
    #[error("must not be empty")]
    Empty,
    #[error("invalid email address: {0}")]
    InvalidEmail(EmailError),
}

/// A single offending field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// Path of the field, e.g. `price` or `items[1].quantity`.
    pub field: String,
    pub kind: ViolationKind,
}

impl FieldViolation {
    #[must_use]
    pub fn new(field: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

impl Serialize for FieldViolation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldViolation", 2)?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("message", &self.kind.to_string())?;
        state.end()
    }
}

/// A payload failed its schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} field(s) failed validation: {}", .violations.len(), summary(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

fn summary(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// All offending fields, in the order they were checked.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    #[must_use]
    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

    /// Returns the violation recorded for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&ViolationKind> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| &v.kind)
    }
}

impl From<Vec<FieldViolation>> for ValidationError {
    fn from(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }
}
