//! Storefront catalog helper.
//!
//! Resolves the bundled (or `STOREFRONT_DATA_ROOT`) tables for a locale and
//! prints the result as compact JSON: the catalog tree, a taxon with its
//! breadcrumb trail, a full listing page with facets, or the list of taxon
//! slugs used for page generation.

use anyhow::{Result, bail};
use serde::Serialize;
use std::env;
use std::ffi::OsString;
use storefront_catalog::{Storefront, StorefrontConfig, logging};

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let command = Command::parse(env::args_os().skip(1))?;
    let config = StorefrontConfig::from_env()?;
    let storefront = Storefront::load(&config)?;

    match command {
        Command::Catalog { locale, products } => print_json(&storefront.catalog(&locale, products)?),
        Command::Find { locale, slug } => {
            let catalog = storefront.catalog(&locale, false)?;
            match catalog.find_taxon(&slug) {
                Some(found) => print_json(&found),
                None => bail!("no taxon with slug '{slug}' in the {locale} catalog"),
            }
        }
        Command::Search { locale, slug } => match storefront.search(&locale, &slug)? {
            Some(page) => print_json(&page),
            None => bail!("no taxon with slug '{slug}' in the {locale} catalog"),
        },
        Command::Paths { locale } => print_json(&storefront.taxon_slugs(&locale)?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Catalog { locale: String, products: bool },
    Find { locale: String, slug: String },
    Search { locale: String, slug: String },
    Paths { locale: String },
}

impl Command {
    fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Self> {
        let subcommand = match args.next() {
            Some(raw) => into_string(raw)?,
            None => {
                print_usage();
                bail!("missing subcommand");
            }
        };
        if matches!(subcommand.as_str(), "--help" | "-h") {
            print_usage();
            std::process::exit(0);
        }

        let mut locale: Option<String> = None;
        let mut slug: Option<String> = None;
        let mut products = false;

        while let Some(arg_os) = args.next() {
            let arg = into_string(arg_os)?;
            match arg.as_str() {
                "--locale" => locale = Some(next_value(&mut args, "--locale")?),
                "--slug" => {
                    let raw = next_value(&mut args, "--slug")?;
                    slug = Some(raw.trim_matches('/').to_string());
                }
                "--products" => products = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}"),
            }
        }

        let locale = locale.ok_or_else(|| anyhow::anyhow!("--locale is required"))?;
        let require_slug =
            |slug: Option<String>| slug.ok_or_else(|| anyhow::anyhow!("--slug is required"));

        match subcommand.as_str() {
            "catalog" => Ok(Command::Catalog { locale, products }),
            "find" => Ok(Command::Find {
                locale,
                slug: require_slug(slug)?,
            }),
            "search" => Ok(Command::Search {
                locale,
                slug: require_slug(slug)?,
            }),
            "paths" => Ok(Command::Paths { locale }),
            other => bail!("unknown subcommand: {other}"),
        }
    }
}

fn into_string(raw: OsString) -> Result<String> {
    raw.into_string()
        .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: storefront <catalog|find|search|paths> --locale CODE [--slug SLUG] [--products]\n\
  catalog  resolve the locale's catalog tree (--products attaches products)\n\
  find     locate a taxon by slug and print it with its breadcrumb path\n\
  search   build the listing page for a taxon: products, rows, facets\n\
  paths    list every taxon slug in the locale's catalog\n"
}

fn print_usage() {
    eprint!("{}", usage());
}
