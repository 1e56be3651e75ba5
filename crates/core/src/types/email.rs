//! Customer email addresses.
//!
//! Only the syntax is checked: one `@`, a non-empty mailbox, and a dotted
//! domain. Deliverability is never probed.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string is not an acceptable email address.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("address is empty")]
    Empty,
    #[error("address is longer than {max} characters")]
    TooLong { max: usize },
    #[error("address contains whitespace")]
    Whitespace,
    #[error("address has no @ sign")]
    MissingAtSymbol,
    #[error("address has more than one @ sign")]
    MultipleAtSymbols,
    #[error("nothing before the @ sign")]
    EmptyLocalPart,
    #[error("nothing after the @ sign")]
    EmptyDomain,
    /// Domain without a dot, or with an empty label such as `a..com`.
    #[error("domain must look like example.com")]
    InvalidDomain,
}

/// A syntactically valid email address.
///
/// Serializes as a plain string and refuses to deserialize invalid input.
///
/// ```
/// use shop_core::Email;
///
/// let email: Email = "ada@example.com".parse().unwrap();
/// assert_eq!(email.domain(), "example.com");
/// assert!("ada@localhost".parse::<Email>().is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email {
    address: String,
    /// Byte offset of the `@`.
    at: usize,
}

impl Email {
    /// Longest accepted address, in bytes (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Check `address` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns the first rule the input breaks, checked in declaration order
    /// of [`EmailError`].
    pub fn parse(address: &str) -> Result<Self, EmailError> {
        match address.len() {
            0 => return Err(EmailError::Empty),
            n if n > Self::MAX_LENGTH => {
                return Err(EmailError::TooLong {
                    max: Self::MAX_LENGTH,
                });
            }
            _ => {}
        }
        if address.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (mailbox, domain) = address
            .split_once('@')
            .ok_or(EmailError::MissingAtSymbol)?;

        if domain.contains('@') {
            Err(EmailError::MultipleAtSymbols)
        } else if mailbox.is_empty() {
            Err(EmailError::EmptyLocalPart)
        } else if domain.is_empty() {
            Err(EmailError::EmptyDomain)
        } else if !domain.contains('.') || domain.split('.').any(str::is_empty) {
            Err(EmailError::InvalidDomain)
        } else {
            Ok(Self {
                address: address.to_owned(),
                at: mailbox.len(),
            })
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// The mailbox part, before the `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.address.get(..self.at).unwrap_or_default()
    }

    /// The domain part, after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.address.get(self.at + 1..).unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.address
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_shapes() {
        for address in [
            "ada@example.com",
            "first.last@example.com",
            "orders+2024@shop.example.co.uk",
            "x@y.io",
        ] {
            assert!(Email::parse(address).is_ok(), "{address} should parse");
        }
    }

    #[test]
    fn test_rejections_name_the_first_broken_rule() {
        let cases = [
            ("", EmailError::Empty),
            ("ada lovelace@example.com", EmailError::Whitespace),
            ("ada.example.com", EmailError::MissingAtSymbol),
            ("ada@home@example.com", EmailError::MultipleAtSymbols),
            ("@example.com", EmailError::EmptyLocalPart),
            ("ada@", EmailError::EmptyDomain),
            ("ada@localhost", EmailError::InvalidDomain),
            ("ada@.example.com", EmailError::InvalidDomain),
            ("ada@example.", EmailError::InvalidDomain),
            ("ada@example..com", EmailError::InvalidDomain),
        ];
        for (input, expected) in cases {
            assert_eq!(Email::parse(input), Err(expected), "input: {input:?}");
        }
    }

    #[test]
    fn test_length_limit() {
        let domain = "@example.com";
        let fits = format!("{}{domain}", "m".repeat(Email::MAX_LENGTH - domain.len()));
        assert!(Email::parse(&fits).is_ok());

        let over = format!("m{fits}");
        assert_eq!(
            Email::parse(&over),
            Err(EmailError::TooLong {
                max: Email::MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_parts() {
        let email: Email = "orders+2024@shop.example.com".parse().unwrap();
        assert_eq!(email.local_part(), "orders+2024");
        assert_eq!(email.domain(), "shop.example.com");
        assert_eq!(email.to_string(), "orders+2024@shop.example.com");
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let email = Email::parse("ada@example.com").unwrap();
        assert_eq!(
            serde_json::to_value(&email).unwrap(),
            serde_json::json!("ada@example.com")
        );
        assert_eq!(
            serde_json::from_str::<Email>("\"ada@example.com\"").unwrap(),
            email
        );
        assert!(serde_json::from_str::<Email>("\"ada\"").is_err());
    }
}
