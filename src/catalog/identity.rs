use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Declares a string-backed key that serializes as a bare JSON string.
///
/// `Borrow<str>` lets the flat-table maps be probed with `&str` directly.
macro_rules! string_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_key!(
    /// Unique key of a catalog row (e.g. `AMER`).
    CatalogKey
);

string_key!(
    /// Unique key of a taxonomy row; catalogs list these in display order.
    TaxonomyKey
);

string_key!(
    /// Stable, tree-internal key of a taxon row.
    TaxonKey
);

string_key!(
    /// Product reference attached to a taxon; resolved by a product lookup.
    ReferenceCode
);
