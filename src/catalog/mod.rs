//! Storefront catalog: flat tables, the resolved tree, and the resolver.
//!
//! `FlatTables` indexes the three JSON tables by key, `CatalogResolver` expands
//! a locale's catalog into nested `Taxonomy`/`Taxon` nodes, and
//! `Storefront` bundles tables, products, and locales for page-level callers.

pub mod identity;
pub mod model;
pub mod repository;
pub mod resolver;
pub mod tables;

pub use identity::{CatalogKey, ReferenceCode, TaxonKey, TaxonomyKey};
pub use model::{
    Catalog, CatalogEntry, NavigationLink, NavigationPath, Taxon, TaxonEntry, Taxonomy,
    TaxonomyEntry, find_taxon_by_key, find_taxon_by_slug, search_href, unique_by_code,
};
pub use repository::{SearchPage, Storefront};
pub use resolver::{CatalogResolver, WithoutProducts, resolve_catalog};
pub use tables::FlatTables;
