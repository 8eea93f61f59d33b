//! Process configuration from the environment.
//!
//! `STOREFRONT_DATA_ROOT` selects the directory holding the JSON tables and
//! `STOREFRONT_FACETS` the facet dimensions (`field[:appearance]` tokens,
//! comma or whitespace separated). Both have defaults so the bundled sample
//! data works out of the box.

use crate::find_data_root;
use crate::products::{FacetAppearance, FacetConfig};
use crate::split_list;
use anyhow::{Result, bail};
use std::env;
use std::path::PathBuf;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub data_root: PathBuf,
    pub facets: Vec<FacetConfig>,
}

impl StorefrontConfig {
    pub fn new(data_root: PathBuf) -> Self {
        Self {
            data_root,
            facets: FacetConfig::defaults(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let data_root = find_data_root()?;
        let facets = match env::var("STOREFRONT_FACETS") {
            Ok(raw) => parse_facets(&raw)?,
            Err(_) => FacetConfig::defaults(),
        };
        if facets.is_empty() {
            warn!("STOREFRONT_FACETS is empty; listings will carry no facets");
        }
        Ok(Self { data_root, facets })
    }
}

/// Parse `color:colorSwatch size` style facet lists.
///
/// A token without an appearance renders as a tag.
pub fn parse_facets(raw: &str) -> Result<Vec<FacetConfig>> {
    let mut facets: Vec<FacetConfig> = Vec::new();
    for token in split_list(raw) {
        let (field, appearance) = match token.split_once(':') {
            Some((field, appearance)) => (field, FacetAppearance::parse(appearance)),
            None => (token.as_str(), FacetAppearance::Tag),
        };
        if field.is_empty() {
            bail!("facet token '{token}' has an empty field name");
        }
        if facets.iter().any(|facet| facet.field == field) {
            bail!("facet field '{field}' listed more than once");
        }
        facets.push(FacetConfig::new(field, appearance));
    }
    Ok(facets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fields_with_and_without_appearance() {
        let facets = parse_facets("color:colorSwatch, size  material:chip").unwrap();
        assert_eq!(
            facets,
            vec![
                FacetConfig::new("color", FacetAppearance::ColorSwatch),
                FacetConfig::new("size", FacetAppearance::Tag),
                FacetConfig::new("material", FacetAppearance::Other("chip".to_string())),
            ]
        );
        assert!(parse_facets("").unwrap().is_empty());
    }

    #[test]
    fn rejects_empty_and_repeated_fields() {
        assert!(parse_facets(":tag").is_err());
        let err = parse_facets("size size:tag").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn new_config_uses_default_facets() {
        let config = StorefrontConfig::new(PathBuf::from("data"));
        let fields: Vec<&str> = config.facets.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["color", "size"]);
    }
}
