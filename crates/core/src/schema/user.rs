//! User schema.
//!
//! Declared for the `user` collection; no route reads or writes users yet.

use serde::{Deserialize, Serialize};

use super::fields::Fields;
use super::{RecordKind, Schema, ValidationError};
use crate::document::RawDocument;
use crate::types::Email;

/// Youngest and oldest accepted ages, in years.
pub const AGE_RANGE: (i64, i64) = (0, 120);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Full name.
    pub name: String,
    pub email: Email,
    pub address: Option<String>,
    /// Age in years, within [`AGE_RANGE`].
    pub age: Option<i64>,
    pub is_active: bool,
}

impl Schema for User {
    const KIND: RecordKind = RecordKind::User;

    fn validate(input: &serde_json::Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(input);

        let name = fields.text("name");
        let email = fields.email("email");
        let address = fields.optional_text("address");
        let age = fields.optional_integer("age", AGE_RANGE.0, AGE_RANGE.1);
        let is_active = fields.flag_or("is_active", true);

        let record = match (name, email, age, is_active) {
            (Some(name), Some(email), Some(age), Some(is_active)) => Some(Self {
                name,
                email,
                address,
                age,
                is_active,
            }),
            _ => None,
        };
        fields.build(record)
    }

    fn to_document(&self) -> RawDocument {
        RawDocument::new()
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("address", self.address.clone())
            .with("age", self.age)
            .with("is_active", self.is_active)
    }
}
