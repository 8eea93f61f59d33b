//! Locale-driven expansion of flat tables into a nested catalog tree.
//!
//! Resolution is a pure function of the tables, the locale, and the product
//! lookup. Trees are rebuilt on every call. Products are attached only when
//! the caller asks for them, since each reference costs one lookup.

use crate::catalog::identity::{ReferenceCode, TaxonKey};
use crate::catalog::model::{Catalog, CatalogEntry, Taxon, Taxonomy, TaxonomyEntry};
use crate::catalog::tables::{FlatTables, cycle_error};
use crate::error::{CatalogError, CatalogResult, EntryKind};
use crate::locale::Locale;
use crate::products::{LocalizedProductWithVariants, ProductLookup};
use tracing::debug;

/// Lookup for shape-only resolution; never consulted when products are off.
#[derive(Clone, Copy, Debug, Default)]
pub struct WithoutProducts;

impl ProductLookup for WithoutProducts {
    fn lookup(
        &self,
        reference: &ReferenceCode,
        _locale_code: &str,
    ) -> CatalogResult<LocalizedProductWithVariants> {
        Err(CatalogError::not_found(EntryKind::Product, reference.as_str()))
    }
}

/// Resolves catalogs against one set of flat tables and one product lookup.
pub struct CatalogResolver<'a, L: ?Sized> {
    tables: &'a FlatTables,
    lookup: &'a L,
}

impl<'a> CatalogResolver<'a, WithoutProducts> {
    /// Resolver for callers that only need the tree shape.
    pub fn tree_only(tables: &'a FlatTables) -> Self {
        Self {
            tables,
            lookup: &WithoutProducts,
        }
    }
}

impl<'a, L> CatalogResolver<'a, L>
where
    L: ProductLookup + ?Sized,
{
    pub fn new(tables: &'a FlatTables, lookup: &'a L) -> Self {
        Self { tables, lookup }
    }

    /// Resolve the catalog selected by `locale`.
    ///
    /// Fails with `NotFound` when no catalog carries the locale's catalog
    /// name; there is no default catalog.
    pub fn resolve(&self, locale: &Locale, fetch_products: bool) -> CatalogResult<Catalog> {
        let name = locale.catalog_name();
        let entry = self.tables.catalog_by_name(name)?;
        debug!(locale = %locale.code, catalog = %entry.key, fetch_products, "resolving catalog");
        self.resolve_entry(entry, &locale.code, fetch_products)
    }

    /// Resolve a specific catalog row for `locale_code`.
    pub fn resolve_entry(
        &self,
        entry: &CatalogEntry,
        locale_code: &str,
        fetch_products: bool,
    ) -> CatalogResult<Catalog> {
        let taxonomies = entry
            .taxonomies
            .iter()
            .map(|key| {
                let taxonomy = self.tables.taxonomy(key.as_str())?;
                self.resolve_taxonomy(taxonomy, locale_code, fetch_products)
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        Ok(Catalog {
            key: entry.key.clone(),
            name: entry.name.clone(),
            taxonomies,
        })
    }

    fn resolve_taxonomy(
        &self,
        taxonomy: &TaxonomyEntry,
        locale_code: &str,
        fetch_products: bool,
    ) -> CatalogResult<Taxonomy> {
        let mut path = Vec::new();
        let taxons = taxonomy
            .taxons
            .iter()
            .map(|key| self.resolve_taxon(key, locale_code, fetch_products, &mut path))
            .collect::<CatalogResult<Vec<_>>>()?;

        Ok(Taxonomy {
            key: taxonomy.key.clone(),
            name: taxonomy.name.clone(),
            label: taxonomy.label.clone(),
            taxons,
        })
    }

    // `path` holds the keys from the taxonomy root down to the parent.
    fn resolve_taxon(
        &self,
        key: &TaxonKey,
        locale_code: &str,
        fetch_products: bool,
        path: &mut Vec<TaxonKey>,
    ) -> CatalogResult<Taxon> {
        if path.contains(key) {
            return Err(cycle_error(path, key));
        }
        let entry = self.tables.taxon(key.as_str())?;
        debug!(taxon = %entry.key, depth = path.len(), "resolving taxon");

        let products = if fetch_products {
            entry
                .references
                .iter()
                .map(|reference| self.lookup.lookup(reference, locale_code))
                .collect::<CatalogResult<Vec<_>>>()?
        } else {
            Vec::new()
        };

        path.push(key.clone());
        let children = entry
            .child_keys()
            .iter()
            .map(|child| self.resolve_taxon(child, locale_code, fetch_products, path))
            .collect::<CatalogResult<Vec<_>>>();
        path.pop();

        Ok(Taxon {
            key: entry.key.clone(),
            label: entry.label.clone(),
            description: entry.description.clone(),
            name: entry.name.clone(),
            slug: entry.slug.clone(),
            image: entry.image.clone(),
            products,
            taxons: children?,
        })
    }
}

/// Resolve the locale's catalog with `lookup` as the product collaborator.
pub fn resolve_catalog<L>(
    tables: &FlatTables,
    lookup: &L,
    locale: &Locale,
    fetch_products: bool,
) -> CatalogResult<Catalog>
where
    L: ProductLookup + ?Sized,
{
    CatalogResolver::new(tables, lookup).resolve(locale, fetch_products)
}
