//! Page-level entry point bundling every table the storefront reads.
//!
//! `Storefront` owns the flat catalog tables, the product table, and the
//! locale table, all loaded once. Each call resolves a fresh catalog tree;
//! nothing is cached between calls.

use crate::catalog::model::{Catalog, Taxon, unique_by_code};
use crate::catalog::resolver::CatalogResolver;
use crate::catalog::tables::FlatTables;
use crate::config::StorefrontConfig;
use crate::error::CatalogResult;
use crate::locale::{Locale, LocaleTable};
use crate::products::{
    FacetConfig, Facets, FlatRow, LocalizedProductWithVariants, ProductTable,
    flatten_product_variants, get_facets,
};
use anyhow::Result;
use serde::Serialize;
use tracing::debug;

/// Everything a taxon listing page renders.
#[derive(Clone, Debug, Serialize)]
pub struct SearchPage {
    pub taxon: Taxon,
    /// Root-to-match trail, ending with `taxon`.
    pub breadcrumbs: Vec<Taxon>,
    /// Products of the taxon and its descendants, unique by `code`.
    pub products: Vec<LocalizedProductWithVariants>,
    pub rows: Vec<FlatRow>,
    pub facets: Facets,
}

#[derive(Clone, Debug)]
pub struct Storefront {
    tables: FlatTables,
    products: ProductTable,
    locales: LocaleTable,
    facets: Vec<FacetConfig>,
}

impl Storefront {
    pub fn new(
        tables: FlatTables,
        products: ProductTable,
        locales: LocaleTable,
        facets: Vec<FacetConfig>,
    ) -> Self {
        Self {
            tables,
            products,
            locales,
            facets,
        }
    }

    /// Load every table under `config.data_root`.
    pub fn load(config: &StorefrontConfig) -> Result<Self> {
        let tables = FlatTables::load(&config.data_root)?;
        let products = ProductTable::load(&config.data_root)?;
        let locales = LocaleTable::load(&config.data_root)?;
        Ok(Self::new(tables, products, locales, config.facets.clone()))
    }

    pub fn tables(&self) -> &FlatTables {
        &self.tables
    }

    pub fn locales(&self) -> &LocaleTable {
        &self.locales
    }

    pub fn locale(&self, code: &str) -> CatalogResult<Locale> {
        self.locales.locale(code)
    }

    /// Resolve the catalog for `locale_code`, attaching products on request.
    pub fn catalog(&self, locale_code: &str, fetch_products: bool) -> CatalogResult<Catalog> {
        let locale = self.locale(locale_code)?;
        CatalogResolver::new(&self.tables, &self.products).resolve(&locale, fetch_products)
    }

    /// Slugs of every taxon page for `locale_code`.
    pub fn taxon_slugs(&self, locale_code: &str) -> CatalogResult<Vec<String>> {
        let locale = self.locale(locale_code)?;
        let catalog = CatalogResolver::tree_only(&self.tables).resolve(&locale, false)?;
        Ok(catalog.taxon_slugs())
    }

    /// Products behind every reference in the locale's catalog.
    pub fn all_products(&self, locale_code: &str) -> CatalogResult<Vec<LocalizedProductWithVariants>> {
        let locale = self.locale(locale_code)?;
        self.tables
            .catalog_references(locale.catalog_name())?
            .iter()
            .map(|reference| self.products.product_with_variants(reference.as_str(), &locale.code))
            .collect()
    }

    /// Build the listing page for the taxon at `slug`.
    ///
    /// An unknown slug is `Ok(None)`; broken table references are errors.
    pub fn search(&self, locale_code: &str, slug: &str) -> CatalogResult<Option<SearchPage>> {
        let catalog = self.catalog(locale_code, true)?;
        let Some(found) = catalog.find_taxon(slug) else {
            debug!(locale = locale_code, slug, "no taxon for slug");
            return Ok(None);
        };

        let products = unique_by_code(found.result.flat_products());
        let rows = flatten_product_variants(&products);
        let facets = get_facets(&rows, &self.facets);
        debug!(
            slug,
            products = products.len(),
            rows = rows.len(),
            "built search page"
        );

        Ok(Some(SearchPage {
            taxon: found.result.clone(),
            breadcrumbs: found.path.iter().map(|taxon| (*taxon).clone()).collect(),
            products,
            rows,
            facets,
        }))
    }
}
