//! Raw and localized product shapes.
//!
//! `RawProduct` mirrors one row of `products.json`: localized fields are maps
//! from locale tag to text, and any extra scalar column (`color`, `size`, ...)
//! is kept as an attribute so facets can be derived without a fixed schema.
//! `LocalizedProduct` is the same row with every localized field collapsed to
//! a single string for one locale.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Locale tag (`en`, `en-US`, ...) to localized text.
pub type LocalizedField = BTreeMap<String, String>;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// One sellable unit as stored in the product table.
pub struct RawProduct {
    pub product_code: String,
    pub variant_code: String,
    pub sku: String,
    pub slug: String,
    pub name: LocalizedField,
    pub description: LocalizedField,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub details: Vec<RawDetail>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
/// Accordion block shown under the product description.
pub struct RawDetail {
    pub title: LocalizedField,
    pub content: LocalizedField,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedProduct {
    /// Product-family identifier; deduplication key.
    pub code: String,
    /// Groups variations that share a listing thumbnail.
    pub variant_code: String,
    pub sku: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    #[serde(default)]
    pub details: Vec<LocalizedDetail>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LocalizedDetail {
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
/// A representative product plus every variant of its product family.
pub struct LocalizedProductWithVariants {
    #[serde(flatten)]
    pub product: LocalizedProduct,
    #[serde(default)]
    pub variants: Vec<LocalizedProduct>,
}

impl LocalizedProductWithVariants {
    pub fn code(&self) -> &str {
        &self.product.code
    }

    /// Variants to list; a product without any stands in for itself.
    pub fn listing_variants(&self) -> &[LocalizedProduct] {
        if self.variants.is_empty() {
            std::slice::from_ref(&self.product)
        } else {
            &self.variants
        }
    }
}

impl RawProduct {
    /// Collapse localized fields for `locale_code`.
    pub fn localize(&self, locale_code: &str) -> LocalizedProduct {
        LocalizedProduct {
            code: self.product_code.clone(),
            variant_code: self.variant_code.clone(),
            sku: self.sku.clone(),
            slug: self.slug.trim_start_matches('/').to_string(),
            name: localized(&self.name, locale_code),
            description: localized(&self.description, locale_code),
            images: self.images.clone(),
            details: self
                .details
                .iter()
                .map(|detail| LocalizedDetail {
                    title: localized(&detail.title, locale_code),
                    content: localized(&detail.content, locale_code),
                })
                .collect(),
            attributes: self
                .attributes
                .iter()
                .filter_map(|(key, value)| scalar_text(value).map(|text| (key.clone(), text)))
                .collect(),
        }
    }
}

/// Pick the text for `locale_code`, falling back to its language part.
///
/// `en-US` tries `en-US` then `en`; a field with neither yields an empty
/// string rather than another language.
pub fn localized(field: &LocalizedField, locale_code: &str) -> String {
    if let Some(text) = field.get(locale_code) {
        return text.clone();
    }
    let language = locale_code.split('-').next().unwrap_or(locale_code);
    field.get(language).cloned().unwrap_or_default()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_tshirt() -> RawProduct {
        serde_json::from_value(json!({
            "productCode": "TSHIRTMM",
            "variantCode": "TSHIRTMMFFFFFF",
            "sku": "TSHIRTMMFFFFFFMXXX",
            "slug": "/white-t-shirt/TSHIRTMMFFFFFFMXXX",
            "name": {"en": "White T-Shirt", "it": "Maglietta Bianca"},
            "description": {"en": "Cotton.", "it-IT": "Cotone."},
            "images": ["https://img.example/tshirt.png"],
            "details": [{"title": {"en": "Care"}, "content": {"en": "Wash cold."}}],
            "color": "white",
            "size": "M",
            "weight": 180,
            "tags": ["summer"]
        }))
        .unwrap()
    }

    #[test]
    fn localize_prefers_exact_tag_then_language() {
        let product = raw_tshirt().localize("it-IT");
        assert_eq!(product.name, "Maglietta Bianca");
        assert_eq!(product.description, "Cotone.");

        let english = raw_tshirt().localize("en-US");
        assert_eq!(english.name, "White T-Shirt");
        assert_eq!(english.details[0].content, "Wash cold.");

        let german = raw_tshirt().localize("de-DE");
        assert_eq!(german.name, "");
    }

    #[test]
    fn localize_strips_slug_and_keeps_scalar_attributes() {
        let product = raw_tshirt().localize("en");
        assert_eq!(product.code, "TSHIRTMM");
        assert_eq!(product.slug, "white-t-shirt/TSHIRTMMFFFFFFMXXX");
        assert_eq!(product.attributes.get("color").map(String::as_str), Some("white"));
        assert_eq!(product.attributes.get("weight").map(String::as_str), Some("180"));
        assert!(!product.attributes.contains_key("tags"));
    }

    #[test]
    fn product_without_variants_lists_itself() {
        let product = LocalizedProductWithVariants {
            product: raw_tshirt().localize("en"),
            variants: Vec::new(),
        };
        assert_eq!(product.listing_variants().len(), 1);
        assert_eq!(product.listing_variants()[0].sku, "TSHIRTMMFFFFFFMXXX");

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json.get("code").and_then(Value::as_str), Some("TSHIRTMM"));
        assert_eq!(json.get("variantCode").and_then(Value::as_str), Some("TSHIRTMMFFFFFF"));
    }
}
