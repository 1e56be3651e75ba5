//! Record kind to collection name table.
//!
//! Collection names are listed explicitly rather than derived from type
//! names, so an irregular name (say a `BlogPost` kind stored in `blogs`) is
//! just another row. The table is checked once when the registry is built.

use super::{RecordKind, Schema};

/// The collections records are stored in.
pub const COLLECTION_TABLE: &[(RecordKind, &str)] = &[
    (RecordKind::User, "user"),
    (RecordKind::Product, "product"),
    (RecordKind::Order, "order"),
];

/// Problems with a collection table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("record kind {0} has no collection")]
    Unmapped(RecordKind),
    #[error("record kind {0} is mapped more than once")]
    DuplicateKind(RecordKind),
    #[error("record kind {0} is embedded and cannot have a collection")]
    Embedded(RecordKind),
    #[error("collection `{0}` is used by more than one record kind")]
    DuplicateCollection(String),
    #[error("invalid collection name `{name}` for {kind}")]
    InvalidName { kind: RecordKind, name: String },
}

/// Validated mapping from stored record kinds to collection names.
#[derive(Debug, Clone)]
pub struct CollectionRegistry {
    entries: Vec<(RecordKind, &'static str)>,
}

impl CollectionRegistry {
    /// Build the registry from [`COLLECTION_TABLE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not an exhaustive, one-to-one mapping
    /// of stored record kinds to valid collection names.
    pub fn new() -> Result<Self, RegistryError> {
        Self::from_table(COLLECTION_TABLE)
    }

    /// Build a registry from an arbitrary table.
    ///
    /// # Errors
    ///
    /// See [`CollectionRegistry::new`].
    pub fn from_table(table: &[(RecordKind, &'static str)]) -> Result<Self, RegistryError> {
        let mut entries: Vec<(RecordKind, &'static str)> = Vec::with_capacity(table.len());

        for &(kind, name) in table {
            if kind.is_embedded() {
                return Err(RegistryError::Embedded(kind));
            }
            if !is_valid_collection_name(name) {
                return Err(RegistryError::InvalidName {
                    kind,
                    name: name.to_owned(),
                });
            }
            if entries.iter().any(|&(k, _)| k == kind) {
                return Err(RegistryError::DuplicateKind(kind));
            }
            if entries.iter().any(|&(_, n)| n == name) {
                return Err(RegistryError::DuplicateCollection(name.to_owned()));
            }
            entries.push((kind, name));
        }

        if let Some(kind) = RecordKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_embedded())
            .find(|kind| !entries.iter().any(|&(k, _)| k == *kind))
        {
            return Err(RegistryError::Unmapped(kind));
        }

        Ok(Self { entries })
    }

    /// Collection holding records of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Embedded`] for kinds that are never stored on
    /// their own.
    pub fn collection(&self, kind: RecordKind) -> Result<&'static str, RegistryError> {
        self.entries
            .iter()
            .find(|&&(k, _)| k == kind)
            .map(|&(_, name)| name)
            .ok_or(if kind.is_embedded() {
                RegistryError::Embedded(kind)
            } else {
                RegistryError::Unmapped(kind)
            })
    }

    /// Collection holding records of schema `S`.
    ///
    /// # Errors
    ///
    /// See [`CollectionRegistry::collection`].
    pub fn collection_for<S: Schema>(&self) -> Result<&'static str, RegistryError> {
        self.collection(S::KIND)
    }

    /// All `(kind, collection)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordKind, &'static str)> + '_ {
        self.entries.iter().copied()
    }
}

/// MongoDB rejects empty names, `$`, NUL and the reserved `system.` prefix.
fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['$', '\0']) && !name.starts_with("system.")
}
