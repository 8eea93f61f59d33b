//! Product/variant flattening into listing rows.

use crate::products::model::{LocalizedProduct, LocalizedProductWithVariants};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// One listing row: a sellable variant plus what its product card needs to
/// render swatches for the rest of the family.
pub struct FlatRow {
    pub code: String,
    pub variant_code: String,
    pub sku: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub images: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    /// Distinct variant codes of the product family, first-seen order.
    pub variant_codes: Vec<String>,
    pub swatches: Vec<Swatch>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Swatch {
    pub variant_code: String,
    pub image: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl FlatRow {
    pub fn attribute(&self, field: &str) -> Option<&str> {
        self.attributes.get(field).map(String::as_str)
    }
}

/// Expand every product into one row per listed variant.
///
/// Input is expected to be unique by `code` already; nothing is deduplicated
/// here, so a repeated product yields repeated rows.
pub fn flatten_product_variants(products: &[LocalizedProductWithVariants]) -> Vec<FlatRow> {
    products.iter().flat_map(flatten_product).collect()
}

fn flatten_product(product: &LocalizedProductWithVariants) -> Vec<FlatRow> {
    let variants = product.listing_variants();
    let swatches = swatches(variants);
    let variant_codes: Vec<String> = swatches
        .iter()
        .map(|swatch| swatch.variant_code.clone())
        .collect();

    variants
        .iter()
        .map(|variant| FlatRow {
            code: product.code().to_string(),
            variant_code: variant.variant_code.clone(),
            sku: variant.sku.clone(),
            slug: variant.slug.clone(),
            name: variant.name.clone(),
            description: variant.description.clone(),
            image: variant.images.first().cloned(),
            images: variant.images.clone(),
            attributes: variant.attributes.clone(),
            variant_codes: variant_codes.clone(),
            swatches: swatches.clone(),
        })
        .collect()
}

// One swatch per variant code, taken from its first sku.
fn swatches(variants: &[LocalizedProduct]) -> Vec<Swatch> {
    let mut swatches: Vec<Swatch> = Vec::new();
    for variant in variants {
        if swatches
            .iter()
            .any(|swatch| swatch.variant_code == variant.variant_code)
        {
            continue;
        }
        swatches.push(Swatch {
            variant_code: variant.variant_code.clone(),
            image: variant.images.first().cloned(),
            attributes: variant.attributes.clone(),
        });
    }
    swatches
}

/// Group rows by a key, keeping first-seen key order and row order.
pub fn group_rows_by<'a, K, F>(rows: &'a [FlatRow], key: F) -> Vec<(K, Vec<&'a FlatRow>)>
where
    K: PartialEq,
    F: Fn(&'a FlatRow) -> K,
{
    let mut groups: Vec<(K, Vec<&'a FlatRow>)> = Vec::new();
    for row in rows {
        let row_key = key(row);
        match groups.iter_mut().find(|(existing, _)| *existing == row_key) {
            Some((_, members)) => members.push(row),
            None => groups.push((row_key, vec![row])),
        }
    }
    groups
}

/// One card per variant code: the first row of each listing group.
pub fn listing_cards(rows: &[FlatRow]) -> Vec<&FlatRow> {
    group_rows_by(rows, |row| (row.code.as_str(), row.variant_code.as_str()))
        .into_iter()
        .filter_map(|(_, members)| members.first().copied())
        .collect()
}
