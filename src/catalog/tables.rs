//! Indexed, read-only view of the three flat catalog tables.
//!
//! Tables are loaded once and never mutated. The index is strict about
//! duplicate keys so a broken export cannot silently shadow an entry; dangling
//! key references are left for the resolver to report, because they only
//! matter for catalogs that are actually resolved.

use crate::catalog::identity::{CatalogKey, ReferenceCode, TaxonKey, TaxonomyKey};
use crate::catalog::model::{CatalogEntry, TaxonEntry, TaxonomyEntry};
use crate::error::{CatalogError, CatalogResult, EntryKind};
use crate::schema_loader::load_validated_table;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

#[derive(Clone, Debug, Default)]
/// Catalog, taxonomy, and taxon rows keyed for O(log n) lookup.
pub struct FlatTables {
    catalogs: Vec<CatalogEntry>,
    taxonomies: BTreeMap<TaxonomyKey, TaxonomyEntry>,
    taxons: BTreeMap<TaxonKey, TaxonEntry>,
}

impl FlatTables {
    /// Build the index from in-memory rows.
    ///
    /// Catalog order is kept because catalogs are matched by name and the
    /// first match wins.
    pub fn from_entries(
        catalogs: Vec<CatalogEntry>,
        taxonomies: Vec<TaxonomyEntry>,
        taxons: Vec<TaxonEntry>,
    ) -> CatalogResult<Self> {
        let mut catalog_keys = BTreeSet::new();
        for catalog in &catalogs {
            if !catalog_keys.insert(catalog.key.clone()) {
                return Err(CatalogError::duplicate(EntryKind::Catalog, catalog.key.as_str()));
            }
        }

        let mut taxonomy_map = BTreeMap::new();
        for taxonomy in taxonomies {
            if taxonomy_map.contains_key(&taxonomy.key) {
                return Err(CatalogError::duplicate(EntryKind::Taxonomy, taxonomy.key.as_str()));
            }
            taxonomy_map.insert(taxonomy.key.clone(), taxonomy);
        }

        let mut taxon_map = BTreeMap::new();
        for taxon in taxons {
            if taxon_map.contains_key(&taxon.key) {
                return Err(CatalogError::duplicate(EntryKind::Taxon, taxon.key.as_str()));
            }
            taxon_map.insert(taxon.key.clone(), taxon);
        }

        Ok(Self {
            catalogs,
            taxonomies: taxonomy_map,
            taxons: taxon_map,
        })
    }

    /// Load `catalogs.json`, `taxonomies.json`, and `taxons.json` from
    /// `data_root`, validating each against its schema.
    pub fn load(data_root: &Path) -> Result<Self> {
        let catalogs: Vec<CatalogEntry> = load_validated_table(data_root, "catalogs")?;
        let taxonomies: Vec<TaxonomyEntry> = load_validated_table(data_root, "taxonomies")?;
        let taxons: Vec<TaxonEntry> = load_validated_table(data_root, "taxons")?;
        let tables = Self::from_entries(catalogs, taxonomies, taxons)
            .with_context(|| format!("indexing catalog tables under {}", data_root.display()))?;
        info!(
            catalogs = tables.catalogs.len(),
            taxonomies = tables.taxonomies.len(),
            taxons = tables.taxons.len(),
            "loaded catalog tables"
        );
        Ok(tables)
    }

    pub fn catalog_by_name(&self, name: &str) -> CatalogResult<&CatalogEntry> {
        self.catalogs
            .iter()
            .find(|catalog| catalog.name == name)
            .ok_or_else(|| CatalogError::not_found(EntryKind::Catalog, name))
    }

    pub fn catalog(&self, key: &CatalogKey) -> Option<&CatalogEntry> {
        self.catalogs.iter().find(|catalog| &catalog.key == key)
    }

    pub fn taxonomy(&self, key: &str) -> CatalogResult<&TaxonomyEntry> {
        self.taxonomies
            .get(key)
            .ok_or_else(|| CatalogError::not_found(EntryKind::Taxonomy, key))
    }

    pub fn taxon(&self, key: &str) -> CatalogResult<&TaxonEntry> {
        self.taxons
            .get(key)
            .ok_or_else(|| CatalogError::not_found(EntryKind::Taxon, key))
    }

    pub fn catalogs(&self) -> &[CatalogEntry] {
        &self.catalogs
    }

    /// Every reference code reachable from the named catalog, pre-order and
    /// without repeats.
    pub fn catalog_references(&self, catalog_name: &str) -> CatalogResult<Vec<ReferenceCode>> {
        let catalog = self.catalog_by_name(catalog_name)?;
        let mut seen = BTreeSet::new();
        let mut references = Vec::new();
        for taxonomy_key in &catalog.taxonomies {
            let taxonomy = self.taxonomy(taxonomy_key.as_str())?;
            for taxon_key in &taxonomy.taxons {
                self.collect_references(taxon_key, &mut Vec::new(), &mut seen, &mut references)?;
            }
        }
        Ok(references)
    }

    fn collect_references(
        &self,
        key: &TaxonKey,
        path: &mut Vec<TaxonKey>,
        seen: &mut BTreeSet<ReferenceCode>,
        out: &mut Vec<ReferenceCode>,
    ) -> CatalogResult<()> {
        if path.contains(key) {
            return Err(cycle_error(path, key));
        }
        let taxon = self.taxon(key.as_str())?;
        out.extend(
            taxon
                .references
                .iter()
                .filter(|reference| seen.insert((*reference).clone()))
                .cloned(),
        );
        path.push(key.clone());
        for child in taxon.child_keys() {
            self.collect_references(child, path, seen, out)?;
        }
        path.pop();
        Ok(())
    }
}

pub(crate) fn cycle_error(path: &[TaxonKey], key: &TaxonKey) -> CatalogError {
    let mut trail: Vec<String> = path.iter().map(|k| k.0.clone()).collect();
    trail.push(key.0.clone());
    CatalogError::Cycle {
        key: key.0.clone(),
        path: trail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn taxon(key: &str, references: &[&str], children: Option<&[&str]>) -> TaxonEntry {
        serde_json::from_value(json!({
            "key": key,
            "label": key,
            "description": "",
            "name": key,
            "slug": key,
            "references": references,
            "taxons": children,
        }))
        .unwrap()
    }

    fn tables(taxons: Vec<TaxonEntry>) -> FlatTables {
        FlatTables::from_entries(
            vec![serde_json::from_value(json!({"key": "c1", "name": "AMER", "taxonomies": ["t1"]})).unwrap()],
            vec![serde_json::from_value(json!({"key": "t1", "name": "Apparel", "taxons": ["root"]})).unwrap()],
            taxons,
        )
        .unwrap()
    }

    #[test]
    fn duplicate_taxon_keys_are_rejected() {
        let err = FlatTables::from_entries(
            Vec::new(),
            Vec::new(),
            vec![taxon("a", &[], None), taxon("a", &[], None)],
        )
        .expect_err("duplicate keys");
        assert_eq!(err, CatalogError::duplicate(EntryKind::Taxon, "a"));
    }

    #[test]
    fn lookups_report_missing_keys() {
        let tables = tables(vec![taxon("root", &[], None)]);
        assert!(tables.taxon("root").is_ok());
        assert_eq!(
            tables.taxon("ghost").unwrap_err(),
            CatalogError::not_found(EntryKind::Taxon, "ghost")
        );
        assert!(tables.taxonomy("t2").unwrap_err().is_not_found());
        assert!(tables.catalog_by_name("EMEA").unwrap_err().is_not_found());
        assert_eq!(tables.catalog(&CatalogKey::from("c1")).map(|c| c.name.as_str()), Some("AMER"));
    }

    #[test]
    fn references_are_collected_preorder_without_repeats() {
        let tables = tables(vec![
            taxon("root", &["P0"], Some(&["a", "b"])),
            taxon("a", &["P1", "P2"], None),
            taxon("b", &["P2", "P3"], Some(&[])),
        ]);
        let refs: Vec<String> = tables
            .catalog_references("AMER")
            .unwrap()
            .into_iter()
            .map(|r| r.0)
            .collect();
        assert_eq!(refs, vec!["P0", "P1", "P2", "P3"]);
    }

    #[test]
    fn reference_walk_detects_cycles() {
        let tables = tables(vec![
            taxon("root", &[], Some(&["a"])),
            taxon("a", &[], Some(&["root"])),
        ]);
        let err = tables.catalog_references("AMER").expect_err("cycle");
        assert!(matches!(err, CatalogError::Cycle { ref key, .. } if key == "root"));
    }
}
