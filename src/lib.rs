//! Catalog resolution and faceted search for a static storefront.
//!
//! The storefront catalog lives in flat JSON tables (catalogs, taxonomies,
//! taxons, products) that reference each other by key. This crate turns those
//! tables into the shapes pages render: a nested catalog tree for a locale, a
//! path-preserving lookup of any taxon by slug, listing rows with one entry per
//! product variant, and facet counts over those rows. Everything past table
//! loading is pure and synchronous.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod config;
pub mod deep_find;
pub mod error;
pub mod locale;
pub mod logging;
pub mod products;
mod schema_loader;

pub use catalog::{
    Catalog, CatalogEntry, CatalogKey, CatalogResolver, FlatTables, NavigationLink, NavigationPath,
    ReferenceCode, SearchPage, Storefront, Taxon, TaxonEntry, TaxonKey, Taxonomy, TaxonomyEntry,
    TaxonomyKey, WithoutProducts, resolve_catalog, unique_by_code,
};
pub use config::StorefrontConfig;
pub use deep_find::{Found, deep_find, deep_find_value};
pub use error::{CatalogError, CatalogResult, EntryKind};
pub use locale::{Country, Language, Locale, LocaleTable, group_by_region};
pub use products::{
    FacetAppearance, FacetConfig, FacetSelection, Facets, FlatRow, LocalizedProduct,
    LocalizedProductWithVariants, ProductLookup, ProductTable, RawProduct, apply_facet_filters,
    flatten_product_variants, get_facets,
};

const DATA_SENTINEL: &str = "catalogs.json";
const DATA_DIR: &str = "data";

/// Returns true when `candidate` holds the storefront tables.
fn is_data_root(candidate: &Path) -> bool {
    candidate.join(DATA_SENTINEL).is_file()
}

/// Verifies that an explicit data root hint points at real tables.
fn data_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.exists() || !is_data_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        let candidate = dir.join(DATA_DIR);
        if is_data_root(&candidate) {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the directory holding the storefront JSON tables.
///
/// Search order: `STOREFRONT_DATA_ROOT` when it points at real tables, then a
/// `data/` directory above the current executable, then the build-time hint.
pub fn find_data_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var("STOREFRONT_DATA_ROOT") {
        if let Some(root) = data_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Some(hint) = option_env!("STOREFRONT_DATA_ROOT_HINT") {
        if let Some(root) = data_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate storefront data. Set STOREFRONT_DATA_ROOT to a directory containing {DATA_SENTINEL}."
    );
}

/// Split comma- or whitespace-delimited configuration lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn split_list_accepts_commas_and_whitespace() {
        assert_eq!(split_list("color, size\tmaterial,,"), vec!["color", "size", "material"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn hint_must_contain_catalog_table() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().display().to_string();
        assert!(data_root_from_hint(&path).is_none());
        assert!(data_root_from_hint("").is_none());

        fs::write(dir.path().join(DATA_SENTINEL), "[]")?;
        assert_eq!(data_root_from_hint(&path), Some(fs::canonicalize(dir.path())?));
        Ok(())
    }

    #[test]
    fn upward_search_finds_nested_data_dir() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("data"))?;
        fs::write(dir.path().join("data").join(DATA_SENTINEL), "[]")?;
        let nested = dir.path().join("target/debug");
        fs::create_dir_all(&nested)?;
        let found = search_upwards(&nested).expect("data dir above target/debug");
        assert!(found.ends_with("data"));
        Ok(())
    }
}
