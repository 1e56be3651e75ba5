//! Field-by-field reader over a JSON payload that collects violations.

use serde_json::{Map, Value};

use super::{FieldViolation, ValidationError, ViolationKind};
use crate::types::Email;

/// Reads typed fields out of a JSON object.
///
/// Each accessor returns `None` when the field is unusable and records why.
/// Absent fields and explicit `null`s are treated alike.
pub(crate) struct Fields<'a> {
    object: Option<&'a Map<String, Value>>,
    prefix: String,
    violations: Vec<FieldViolation>,
}

impl<'a> Fields<'a> {
    /// Reader for a top-level request body.
    pub(crate) fn new(input: &'a Value) -> Self {
        Self::at(input, "body", String::new())
    }

    /// Reader for an object nested at `path` (e.g. `items[2]`).
    pub(crate) fn nested(input: &'a Value, path: &str) -> Self {
        Self::at(input, path, format!("{path}."))
    }

    fn at(input: &'a Value, path: &str, prefix: String) -> Self {
        let object = input.as_object();
        let mut violations = Vec::new();
        if object.is_none() {
            violations.push(FieldViolation::new(
                path,
                ViolationKind::TypeMismatch { expected: "object" },
            ));
        }
        Self {
            object,
            prefix,
            violations,
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.object
            .and_then(|object| object.get(name))
            .filter(|value| !value.is_null())
    }

    fn violate(&mut self, name: &str, kind: ViolationKind) {
        // A non-object input was already reported once for the whole object
        if self.object.is_some() {
            self.violations
                .push(FieldViolation::new(format!("{}{name}", self.prefix), kind));
        }
    }

    fn require(&mut self, name: &str) -> Option<&'a Value> {
        let value = self.lookup(name);
        if value.is_none() {
            self.violate(name, ViolationKind::Missing);
        }
        value
    }

    fn as_text(&mut self, name: &str, value: &Value) -> Option<String> {
        if let Value::String(s) = value {
            Some(s.clone())
        } else {
            self.violate(name, ViolationKind::TypeMismatch { expected: "string" });
            None
        }
    }

    fn as_number(&mut self, name: &str, value: &Value, min: f64) -> Option<f64> {
        let Some(n) = value.as_f64() else {
            self.violate(name, ViolationKind::TypeMismatch { expected: "number" });
            return None;
        };
        if n < min {
            self.violate(name, ViolationKind::BelowMinimum { min });
            return None;
        }
        Some(n)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn as_integer(&mut self, name: &str, value: &Value, min: i64, max: Option<i64>) -> Option<i64> {
        let parsed = value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        });
        let Some(n) = parsed else {
            self.violate(name, ViolationKind::TypeMismatch { expected: "integer" });
            return None;
        };
        if n < min {
            self.violate(name, ViolationKind::BelowMinimum { min: min as f64 });
            return None;
        }
        if let Some(max) = max.filter(|&max| n > max) {
            self.violate(name, ViolationKind::AboveMaximum { max: max as f64 });
            return None;
        }
        Some(n)
    }

    /// Required string.
    pub(crate) fn text(&mut self, name: &str) -> Option<String> {
        let value = self.require(name)?;
        self.as_text(name, value)
    }

    /// Required string that is not blank.
    pub(crate) fn non_empty_text(&mut self, name: &str) -> Option<String> {
        let text = self.text(name)?;
        if text.trim().is_empty() {
            self.violate(name, ViolationKind::Empty);
            return None;
        }
        Some(text)
    }

    /// Optional string; a present value of the wrong type is still a violation.
    pub(crate) fn optional_text(&mut self, name: &str) -> Option<String> {
        let value = self.lookup(name)?;
        self.as_text(name, value)
    }

    /// Required, syntactically valid email address.
    pub(crate) fn email(&mut self, name: &str) -> Option<Email> {
        let text = self.text(name)?;
        match Email::parse(&text) {
            Ok(email) => Some(email),
            Err(err) => {
                self.violate(name, ViolationKind::InvalidEmail(err));
                None
            }
        }
    }

    /// Required number no smaller than `min`.
    pub(crate) fn number(&mut self, name: &str, min: f64) -> Option<f64> {
        let value = self.require(name)?;
        self.as_number(name, value, min)
    }

    /// Optional number no smaller than `min`, `default` when absent.
    pub(crate) fn number_or(&mut self, name: &str, default: f64, min: f64) -> Option<f64> {
        match self.lookup(name) {
            Some(value) => self.as_number(name, value, min),
            None => Some(default),
        }
    }

    /// Required integer no smaller than `min`.
    pub(crate) fn integer(&mut self, name: &str, min: i64) -> Option<i64> {
        let value = self.require(name)?;
        self.as_integer(name, value, min, None)
    }

    /// Optional integer within `min..=max`.
    ///
    /// `Some(None)` when absent, `None` when present but invalid.
    pub(crate) fn optional_integer(&mut self, name: &str, min: i64, max: i64) -> Option<Option<i64>> {
        match self.lookup(name) {
            Some(value) => self.as_integer(name, value, min, Some(max)).map(Some),
            None => Some(None),
        }
    }

    /// Optional boolean, `default` when absent.
    pub(crate) fn flag_or(&mut self, name: &str, default: bool) -> Option<bool> {
        match self.lookup(name) {
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => {
                self.violate(name, ViolationKind::TypeMismatch { expected: "boolean" });
                None
            }
            None => Some(default),
        }
    }

    /// Optional string, `default` when absent.
    pub(crate) fn text_or(&mut self, name: &str, default: &str) -> Option<String> {
        match self.lookup(name) {
            Some(value) => self.as_text(name, value),
            None => Some(default.to_owned()),
        }
    }

    /// Required array.
    pub(crate) fn list(&mut self, name: &str) -> Option<&'a [Value]> {
        let value = self.require(name)?;
        if let Value::Array(items) = value {
            Some(items.as_slice())
        } else {
            self.violate(name, ViolationKind::TypeMismatch { expected: "array" });
            None
        }
    }

    /// Path of a nested field under this reader, e.g. `items[0]`.
    pub(crate) fn path(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// Take over the violations of a nested reader.
    pub(crate) fn absorb(&mut self, nested: Self) {
        self.violations.extend(nested.violations);
    }

    /// Finish reading: the record if every field was usable, otherwise every
    /// violation recorded so far.
    pub(crate) fn build<T>(self, record: Option<T>) -> Result<T, ValidationError> {
        match record {
            Some(record) if self.violations.is_empty() => Ok(record),
            _ => Err(ValidationError::from(self.violations)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_non_object_reported_once() {
        let input = json!([1, 2, 3]);
        let mut fields = Fields::new(&input);
        assert_eq!(fields.text("title"), None);
        assert_eq!(fields.number("price", 0.0), None);
        let err = fields.build::<()>(None).unwrap_err();
        assert_eq!(
            err.violations(),
            [FieldViolation::new(
                "body",
                ViolationKind::TypeMismatch { expected: "object" }
            )]
        );
    }

    #[test]
    fn test_null_treated_as_absent() {
        let input = json!({ "image": null, "title": null });
        let mut fields = Fields::new(&input);
        assert_eq!(fields.optional_text("image"), None);
        assert_eq!(fields.text("title"), None);
        let err = fields.build::<()>(None).unwrap_err();
        assert_eq!(err.for_field("title"), Some(&ViolationKind::Missing));
        assert_eq!(err.for_field("image"), None);
    }

    #[test]
    fn test_integer_accepts_integral_float() {
        let input = json!({ "quantity": 2.0, "other": 2.5 });
        let mut fields = Fields::new(&input);
        assert_eq!(fields.integer("quantity", 1), Some(2));
        assert_eq!(fields.integer("other", 1), None);
    }

    #[test]
    fn test_nested_paths() {
        let input = json!({ "price": "free" });
        let mut nested = Fields::nested(&input, "items[3]");
        assert_eq!(nested.number("price", 0.0), None);
        let err = nested.build::<()>(None).unwrap_err();
        assert_eq!(
            err.for_field("items[3].price"),
            Some(&ViolationKind::TypeMismatch { expected: "number" })
        );
    }
}
