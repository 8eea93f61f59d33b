//! Flat-table rows and the resolved catalog tree.
//!
//! The `*Entry` types mirror `catalogs.json`, `taxonomies.json`, and
//! `taxons.json`: children are referenced by key. `Catalog`, `Taxonomy`, and
//! `Taxon` are the resolved form the resolver builds on every call, with key
//! lists replaced by nested nodes in the same order.

use crate::catalog::identity::{CatalogKey, ReferenceCode, TaxonKey, TaxonomyKey};
use crate::deep_find::{Found, deep_find};
use crate::products::LocalizedProductWithVariants;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
/// One row of the catalog table.
pub struct CatalogEntry {
    pub key: CatalogKey,
    pub name: String,
    #[serde(default)]
    pub taxonomies: Vec<TaxonomyKey>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
/// One row of the taxonomy table.
pub struct TaxonomyEntry {
    pub key: TaxonomyKey,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub taxons: Vec<TaxonKey>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
/// One row of the taxon table.
///
/// A missing `taxons` list and an empty one both mean "leaf".
pub struct TaxonEntry {
    pub key: TaxonKey,
    pub label: String,
    pub description: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub references: Vec<ReferenceCode>,
    #[serde(default)]
    pub taxons: Option<Vec<TaxonKey>>,
}

impl TaxonEntry {
    pub fn child_keys(&self) -> &[TaxonKey] {
        self.taxons.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Catalog {
    pub key: CatalogKey,
    pub name: String,
    pub taxonomies: Vec<Taxonomy>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Taxonomy {
    pub key: TaxonomyKey,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub taxons: Vec<Taxon>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
/// A browsable category with its children resolved.
///
/// `products` holds only what this taxon's own references resolved to;
/// descendants keep theirs. Use [`Taxon::flat_products`] for the aggregate.
pub struct Taxon {
    pub key: TaxonKey,
    pub label: String,
    pub description: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub products: Vec<LocalizedProductWithVariants>,
    pub taxons: Vec<Taxon>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
/// A top-level menu entry.
pub struct NavigationLink {
    pub key: TaxonKey,
    pub text: String,
    pub href: String,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct NavigationPath {
    pub children: Vec<NavigationLink>,
}

impl Taxon {
    /// Own products followed by every descendant's, pre-order.
    pub fn flat_products(&self) -> Vec<LocalizedProductWithVariants> {
        let mut products = self.products.clone();
        for child in &self.taxons {
            products.extend(child.flat_products());
        }
        products
    }

    /// This taxon's slug followed by every descendant slug, pre-order.
    pub fn flat_slugs(&self) -> Vec<String> {
        let mut slugs = vec![self.slug.clone()];
        for child in &self.taxons {
            slugs.extend(child.flat_slugs());
        }
        slugs
    }

    pub fn is_leaf(&self) -> bool {
        self.taxons.is_empty()
    }
}

/// Deep Search over sibling taxons, matching on `slug`.
pub fn find_taxon_by_slug<'a>(taxons: &'a [Taxon], slug: &str) -> Option<Found<'a, Taxon>> {
    deep_find(
        Some(taxons),
        &|taxon: &'a Taxon| Some(taxon.taxons.as_slice()),
        &|taxon: &'a Taxon| Some(taxon.slug.as_str()),
        slug,
    )
}

/// Deep Search over sibling taxons, matching on `key`.
pub fn find_taxon_by_key<'a>(taxons: &'a [Taxon], key: &str) -> Option<Found<'a, Taxon>> {
    deep_find(
        Some(taxons),
        &|taxon: &'a Taxon| Some(taxon.taxons.as_slice()),
        &|taxon: &'a Taxon| Some(taxon.key.as_str()),
        key,
    )
}

impl Catalog {
    /// Look a slug up in each taxonomy in order; the first hit wins.
    pub fn find_taxon(&self, slug: &str) -> Option<Found<'_, Taxon>> {
        self.taxonomies
            .iter()
            .find_map(|taxonomy| find_taxon_by_slug(&taxonomy.taxons, slug))
    }

    /// Every taxon slug in the catalog, taxonomy by taxonomy, pre-order.
    pub fn taxon_slugs(&self) -> Vec<String> {
        self.taxonomies
            .iter()
            .flat_map(|taxonomy| taxonomy.taxons.iter().flat_map(Taxon::flat_slugs))
            .collect()
    }

    /// Links to each taxonomy's top-level taxons.
    pub fn navigation(&self) -> NavigationPath {
        NavigationPath {
            children: self
                .taxonomies
                .iter()
                .flat_map(|taxonomy| taxonomy.taxons.iter())
                .map(|taxon| NavigationLink {
                    key: taxon.key.clone(),
                    text: taxon.label.clone(),
                    href: search_href(&taxon.slug),
                })
                .collect(),
        }
    }
}

/// Storefront URL of a taxon listing page.
pub fn search_href(slug: &str) -> String {
    format!("/search/{}", slug.trim_start_matches('/'))
}

/// Keep the first product per `code`, preserving order.
pub fn unique_by_code(products: Vec<LocalizedProductWithVariants>) -> Vec<LocalizedProductWithVariants> {
    let mut seen = std::collections::BTreeSet::new();
    products
        .into_iter()
        .filter(|product| seen.insert(product.code().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::LocalizedProduct;

    fn product(code: &str) -> LocalizedProductWithVariants {
        LocalizedProductWithVariants {
            product: LocalizedProduct {
                code: code.to_string(),
                variant_code: format!("{code}V"),
                sku: format!("{code}S"),
                slug: code.to_lowercase(),
                name: code.to_string(),
                description: String::new(),
                images: Vec::new(),
                details: Vec::new(),
                attributes: Default::default(),
            },
            variants: Vec::new(),
        }
    }

    fn taxon(key: &str, slug: &str, products: Vec<&str>, taxons: Vec<Taxon>) -> Taxon {
        Taxon {
            key: TaxonKey::from(key),
            label: key.to_uppercase(),
            description: String::new(),
            name: key.to_string(),
            slug: slug.to_string(),
            image: None,
            products: products.into_iter().map(product).collect(),
            taxons,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            key: CatalogKey::from("AMER"),
            name: "AMER".to_string(),
            taxonomies: vec![
                Taxonomy {
                    key: TaxonomyKey::from("apparel"),
                    name: "Apparel".to_string(),
                    label: None,
                    taxons: vec![taxon(
                        "root",
                        "shop",
                        vec!["P0"],
                        vec![
                            taxon("men", "shop/men", vec!["P1", "P2"], vec![]),
                            taxon("women", "shop/women", vec!["P2", "P3"], vec![]),
                        ],
                    )],
                },
                Taxonomy {
                    key: TaxonomyKey::from("gifts"),
                    name: "Gifts".to_string(),
                    label: Some("Gift ideas".to_string()),
                    taxons: vec![taxon("mugs", "/gifts/mugs", vec![], vec![])],
                },
            ],
        }
    }

    #[test]
    fn entry_without_children_is_a_leaf() {
        let entry: TaxonEntry = serde_json::from_str(
            r#"{"key":"men","label":"Men","description":"","name":"men","slug":"shop/men"}"#,
        )
        .unwrap();
        assert!(entry.child_keys().is_empty());
        assert!(entry.references.is_empty());
    }

    #[test]
    fn flat_products_aggregate_descendants_in_preorder() {
        let catalog = catalog();
        let root = &catalog.taxonomies[0].taxons[0];
        assert_eq!(root.products.len(), 1);
        let codes: Vec<String> = root
            .flat_products()
            .iter()
            .map(|p| p.code().to_string())
            .collect();
        assert_eq!(codes, vec!["P0", "P1", "P2", "P2", "P3"]);

        let unique: Vec<String> = unique_by_code(root.flat_products())
            .iter()
            .map(|p| p.code().to_string())
            .collect();
        assert_eq!(unique, vec!["P0", "P1", "P2", "P3"]);
    }

    #[test]
    fn find_taxon_searches_taxonomies_in_order() {
        let catalog = catalog();
        let found = catalog.find_taxon("shop/women").expect("women exists");
        let keys: Vec<&str> = found.path.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["root", "women"]);

        let mugs = catalog.find_taxon("/gifts/mugs").expect("mugs exists");
        assert_eq!(mugs.depth(), 1);
        assert!(catalog.find_taxon("shop/kids").is_none());

        let by_key = find_taxon_by_key(&catalog.taxonomies[0].taxons, "men").expect("men");
        assert_eq!(by_key.result.slug, "shop/men");
    }

    #[test]
    fn slugs_and_navigation_follow_tree_order() {
        let catalog = catalog();
        assert_eq!(
            catalog.taxon_slugs(),
            vec!["shop", "shop/men", "shop/women", "/gifts/mugs"]
        );
        let nav = catalog.navigation();
        let hrefs: Vec<&str> = nav.children.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/search/shop", "/search/gifts/mugs"]);
        assert_eq!(nav.children[0].text, "ROOT");
    }
}
