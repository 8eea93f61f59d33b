//! Product lookup collaborator used by the catalog resolver.

use crate::catalog::ReferenceCode;
use crate::error::{CatalogError, CatalogResult, EntryKind};
use crate::products::model::{LocalizedProductWithVariants, RawProduct};
use crate::schema_loader::load_validated_table;
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Resolves a taxon's reference code into a localized product.
///
/// The resolver calls this once per reference, in list order, and aborts the
/// whole resolution on the first error.
pub trait ProductLookup {
    fn lookup(
        &self,
        reference: &ReferenceCode,
        locale_code: &str,
    ) -> CatalogResult<LocalizedProductWithVariants>;
}

impl<F> ProductLookup for F
where
    F: Fn(&ReferenceCode, &str) -> CatalogResult<LocalizedProductWithVariants>,
{
    fn lookup(
        &self,
        reference: &ReferenceCode,
        locale_code: &str,
    ) -> CatalogResult<LocalizedProductWithVariants> {
        self(reference, locale_code)
    }
}

#[derive(Clone, Debug, Default)]
/// The product table, kept in file order.
pub struct ProductTable {
    products: Vec<RawProduct>,
}

impl ProductTable {
    pub fn new(products: Vec<RawProduct>) -> Self {
        Self { products }
    }

    /// Load and validate `<data_root>/products.json`.
    pub fn load(data_root: &Path) -> Result<Self> {
        let products: Vec<RawProduct> = load_validated_table(data_root, "products")?;
        info!(count = products.len(), "loaded product table");
        Ok(Self::new(products))
    }

    pub fn products(&self) -> &[RawProduct] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// First row whose product code matches, else the row with that sku.
    fn representative(&self, reference: &str) -> Option<&RawProduct> {
        self.products
            .iter()
            .find(|product| product.product_code == reference)
            .or_else(|| self.products.iter().find(|product| product.sku == reference))
    }

    /// Representative product plus every row of its product family.
    pub fn product_with_variants(
        &self,
        reference: &str,
        locale_code: &str,
    ) -> CatalogResult<LocalizedProductWithVariants> {
        let product = self
            .representative(reference)
            .ok_or_else(|| CatalogError::not_found(EntryKind::Product, reference))?;
        let variants = self
            .products
            .iter()
            .filter(|candidate| candidate.product_code == product.product_code)
            .map(|candidate| candidate.localize(locale_code))
            .collect();
        Ok(LocalizedProductWithVariants {
            product: product.localize(locale_code),
            variants,
        })
    }
}

impl ProductLookup for ProductTable {
    fn lookup(
        &self,
        reference: &ReferenceCode,
        locale_code: &str,
    ) -> CatalogResult<LocalizedProductWithVariants> {
        self.product_with_variants(reference.as_str(), locale_code)
    }
}
