//! Error model for catalog resolution.
//!
//! `CatalogError` covers deterministic data-integrity failures: a broken key
//! reference, a duplicated key, or a cyclic taxon nesting. Flat tables are
//! static, so none of these are retried. File I/O and schema validation stay on
//! `anyhow` at the loading boundary.

use std::fmt;
use thiserror::Error;

/// Result type used by the resolver and lookup collaborators.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Which flat table (or external collaborator) a key belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    Catalog,
    Taxonomy,
    Taxon,
    Product,
    Language,
    Country,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Catalog => "catalog",
            EntryKind::Taxonomy => "taxonomy",
            EntryKind::Taxon => "taxon",
            EntryKind::Product => "product",
            EntryKind::Language => "language",
            EntryKind::Country => "country",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A catalog name or a referenced key has no entry in its table.
    #[error("cannot find the {kind} with key \"{key}\"")]
    NotFound { kind: EntryKind, key: String },

    /// A taxon key reappeared on its own resolution path.
    #[error("taxon \"{key}\" nests itself via {}", .path.join(" -> "))]
    Cycle { key: String, path: Vec<String> },

    /// Two entries in the same table share a unique key.
    #[error("duplicate {kind} key \"{key}\"")]
    DuplicateKey { kind: EntryKind, key: String },
}

impl CatalogError {
    pub fn not_found(kind: EntryKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn duplicate(kind: EntryKind, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            kind,
            key: key.into(),
        }
    }

    /// True for the `NotFound` variant, regardless of table.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}
