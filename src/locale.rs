//! Locale context: which catalog a shopper sees and which text they read.
//!
//! A locale code is `<language>` or `<language>-<COUNTRY>`. Countries may pin
//! their own catalog; otherwise the language's catalog applies.

use crate::error::{CatalogError, CatalogResult, EntryKind};
use crate::schema_loader::load_validated_table;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
    pub catalog: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub region: String,
    pub default_language: String,
    pub market: u64,
    #[serde(default)]
    pub catalog: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Locale {
    pub code: String,
    pub language: Language,
    pub country: Option<Country>,
}

impl Locale {
    /// Catalog name for this locale: the country's, when set, else the
    /// language's.
    pub fn catalog_name(&self) -> &str {
        self.country
            .as_ref()
            .and_then(|country| country.catalog.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.language.catalog)
    }
}

#[derive(Clone, Debug, Default)]
/// Languages and countries the storefront is published in.
pub struct LocaleTable {
    languages: Vec<Language>,
    countries: Vec<Country>,
}

impl LocaleTable {
    pub fn new(languages: Vec<Language>, countries: Vec<Country>) -> Self {
        Self {
            languages,
            countries,
        }
    }

    /// Load and validate `languages.json` and `countries.json`.
    pub fn load(data_root: &Path) -> Result<Self> {
        let languages: Vec<Language> = load_validated_table(data_root, "languages")?;
        let countries: Vec<Country> = load_validated_table(data_root, "countries")?;
        info!(
            languages = languages.len(),
            countries = countries.len(),
            "loaded locale tables"
        );
        Ok(Self::new(languages, countries))
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Resolve `en` or `en-US` into a full locale.
    ///
    /// Language codes compare case-sensitively; country codes ignore case.
    pub fn locale(&self, code: &str) -> CatalogResult<Locale> {
        let (language_code, country_code) = match code.split_once('-') {
            Some((language, country)) => (language, Some(country)),
            None => (code, None),
        };

        let language = self
            .languages
            .iter()
            .find(|language| language.code == language_code)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(EntryKind::Language, language_code))?;

        let country = match country_code {
            Some(country_code) => Some(
                self.countries
                    .iter()
                    .find(|country| country.code.eq_ignore_ascii_case(country_code))
                    .cloned()
                    .ok_or_else(|| CatalogError::not_found(EntryKind::Country, country_code))?,
            ),
            None => None,
        };

        Ok(Locale {
            code: code.to_string(),
            language,
            country,
        })
    }

    /// Every published locale code: bare languages first, then each country
    /// with its default language.
    pub fn locale_codes(&self) -> Vec<String> {
        self.languages
            .iter()
            .map(|language| language.code.clone())
            .chain(
                self.countries
                    .iter()
                    .map(|country| format!("{}-{}", country.default_language, country.code)),
            )
            .collect()
    }
}

/// Group countries by region; regions sort by name, countries keep input order.
pub fn group_by_region(countries: &[Country]) -> BTreeMap<String, Vec<Country>> {
    let mut grouped: BTreeMap<String, Vec<Country>> = BTreeMap::new();
    for country in countries {
        grouped
            .entry(country.region.clone())
            .or_default()
            .push(country.clone());
    }
    grouped
}
