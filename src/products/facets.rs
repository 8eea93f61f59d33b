//! Facet dimensions derived from flattened listing rows.
//!
//! Facets are computed, never stored: for every configured field the builder
//! scans all rows and counts rows per distinct value. Values keep first-seen
//! order so the UI renders them stably; sorting is a separate opt-in step.

use crate::products::flatten::{FlatRow, flatten_product_variants};
use crate::products::model::LocalizedProductWithVariants;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// How a facet is rendered by the storefront.
///
/// Known variants keep serialization consistent; `Other` carries appearances
/// introduced by newer front ends.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FacetAppearance {
    ColorSwatch,
    Tag,
    Other(String),
}

impl FacetAppearance {
    pub fn as_str(&self) -> &str {
        match self {
            FacetAppearance::ColorSwatch => "colorSwatch",
            FacetAppearance::Tag => "tag",
            FacetAppearance::Other(value) => value.as_str(),
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "colorSwatch" => FacetAppearance::ColorSwatch,
            "tag" => FacetAppearance::Tag,
            other => FacetAppearance::Other(other.to_string()),
        }
    }
}

impl Serialize for FacetAppearance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FacetAppearance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// A facet dimension requested by the caller.
pub struct FacetConfig {
    pub field: String,
    pub appearance: FacetAppearance,
}

impl FacetConfig {
    pub fn new(field: impl Into<String>, appearance: FacetAppearance) -> Self {
        Self {
            field: field.into(),
            appearance,
        }
    }

    /// The storefront's stock dimensions: color swatches and size tags.
    pub fn defaults() -> Vec<FacetConfig> {
        vec![
            FacetConfig::new("color", FacetAppearance::ColorSwatch),
            FacetConfig::new("size", FacetAppearance::Tag),
        ]
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FacetValue {
    pub value: String,
    pub count: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub field: String,
    pub appearance: FacetAppearance,
    pub values: Vec<FacetValue>,
}

impl Facet {
    pub fn count_of(&self, value: &str) -> Option<usize> {
        self.values
            .iter()
            .find(|entry| entry.value == value)
            .map(|entry| entry.count)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// One facet per configured field, in configuration order.
pub struct Facets(pub Vec<Facet>);

impl Facets {
    pub fn get(&self, field: &str) -> Option<&Facet> {
        self.0.iter().find(|facet| facet.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Facet> {
        self.0.iter()
    }

    /// Copy with values ordered by count, highest first; ties keep
    /// first-seen order.
    pub fn sorted_by_count(&self) -> Facets {
        let mut sorted = self.clone();
        for facet in &mut sorted.0 {
            facet.values.sort_by(|a, b| b.count.cmp(&a.count));
        }
        sorted
    }
}

/// Compute facets for `config` over `rows`.
///
/// A row without a field contributes nothing to that facet.
pub fn get_facets(rows: &[FlatRow], config: &[FacetConfig]) -> Facets {
    let facets = config
        .iter()
        .map(|dimension| {
            let mut values: Vec<FacetValue> = Vec::new();
            for value in rows.iter().filter_map(|row| row.attribute(&dimension.field)) {
                match values.iter_mut().find(|entry| entry.value == value) {
                    Some(entry) => entry.count += 1,
                    None => values.push(FacetValue {
                        value: value.to_string(),
                        count: 1,
                    }),
                }
            }
            Facet {
                field: dimension.field.clone(),
                appearance: dimension.appearance.clone(),
                values,
            }
        })
        .collect();
    Facets(facets)
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Facet values picked by a shopper, per field.
pub struct FacetSelection(pub BTreeMap<String, BTreeSet<String>>);

impl FacetSelection {
    pub fn select(&mut self, field: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.entry(field.into()).or_default().insert(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    /// OR within a field, AND across fields.
    pub fn matches(&self, row: &FlatRow) -> bool {
        self.0.iter().all(|(field, wanted)| {
            wanted.is_empty()
                || row
                    .attribute(field)
                    .map(|value| wanted.contains(value))
                    .unwrap_or(false)
        })
    }
}

/// Keep products with at least one listing row matching `selection`.
pub fn apply_facet_filters(
    products: &[LocalizedProductWithVariants],
    selection: &FacetSelection,
) -> Vec<LocalizedProductWithVariants> {
    if selection.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|product| {
            flatten_product_variants(std::slice::from_ref(*product))
                .iter()
                .any(|row| selection.matches(row))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::model::LocalizedProduct;

    fn row(code: &str, attributes: &[(&str, &str)]) -> FlatRow {
        FlatRow {
            code: code.to_string(),
            variant_code: code.to_string(),
            sku: code.to_string(),
            slug: code.to_string(),
            name: code.to_string(),
            description: String::new(),
            image: None,
            images: Vec::new(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            variant_codes: vec![code.to_string()],
            swatches: Vec::new(),
        }
    }

    #[test]
    fn empty_rows_give_empty_facet_per_field() {
        let facets = get_facets(&[], &FacetConfig::defaults());
        assert_eq!(facets.0.len(), 2);
        assert!(facets.iter().all(|facet| facet.values.is_empty()));
        assert_eq!(
            facets.get("color").map(|f| f.appearance.clone()),
            Some(FacetAppearance::ColorSwatch)
        );
    }

    #[test]
    fn shared_value_counts_every_row() {
        let rows: Vec<FlatRow> = (0..4).map(|i| row(&format!("P{i}"), &[("color", "black")])).collect();
        let facets = get_facets(&rows, &FacetConfig::defaults());
        let color = facets.get("color").expect("color facet");
        assert_eq!(color.values, vec![FacetValue { value: "black".into(), count: 4 }]);
        assert!(facets.get("size").map(|f| f.values.is_empty()).unwrap_or(false));
    }

    #[test]
    fn values_keep_first_seen_order_until_sorted() {
        let rows = vec![
            row("A", &[("size", "M")]),
            row("B", &[("size", "XL")]),
            row("C", &[("size", "XL")]),
            row("D", &[]),
        ];
        let facets = get_facets(&rows, &[FacetConfig::new("size", FacetAppearance::Tag)]);
        let order: Vec<&str> = facets.0[0].values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(order, vec!["M", "XL"]);

        let sorted = facets.sorted_by_count();
        assert_eq!(sorted.0[0].values[0].value, "XL");
        assert_eq!(sorted.0[0].count_of("M"), Some(1));
    }

    #[test]
    fn appearance_round_trips_known_and_unknown() {
        let json = serde_json::to_string(&FacetAppearance::ColorSwatch).unwrap();
        assert_eq!(json, "\"colorSwatch\"");
        let parsed: FacetAppearance = serde_json::from_str("\"slider\"").unwrap();
        assert_eq!(parsed, FacetAppearance::Other("slider".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"slider\"");
    }

    #[test]
    fn filters_or_within_field_and_across_fields() {
        let product = |code: &str, color: &str, size: &str| LocalizedProductWithVariants {
            product: LocalizedProduct {
                code: code.to_string(),
                variant_code: code.to_string(),
                sku: code.to_string(),
                slug: code.to_string(),
                name: code.to_string(),
                description: String::new(),
                images: Vec::new(),
                details: Vec::new(),
                attributes: BTreeMap::from([
                    ("color".to_string(), color.to_string()),
                    ("size".to_string(), size.to_string()),
                ]),
            },
            variants: Vec::new(),
        };
        let products = vec![
            product("A", "black", "M"),
            product("B", "white", "M"),
            product("C", "red", "L"),
        ];

        let mut selection = FacetSelection::default();
        assert_eq!(apply_facet_filters(&products, &selection).len(), 3);

        selection.select("color", "black").select("color", "red");
        let codes: Vec<String> = apply_facet_filters(&products, &selection)
            .iter()
            .map(|p| p.code().to_string())
            .collect();
        assert_eq!(codes, vec!["A", "C"]);

        selection.select("size", "L");
        let codes: Vec<String> = apply_facet_filters(&products, &selection)
            .iter()
            .map(|p| p.code().to_string())
            .collect();
        assert_eq!(codes, vec!["C"]);
    }
}
