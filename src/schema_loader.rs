//! JSON Schema loading and validated table reads.
//!
//! Every flat table on disk has a sibling schema under `schema/`. Tables are
//! validated as raw `serde_json::Value`s first, so shape errors come back as a
//! list of schema violations instead of a single serde message, and only then
//! deserialized into typed rows.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub compiled: JSONSchema,
    pub raw: Value,
}

pub(crate) fn load_json_schema(path: &Path) -> Result<SchemaLoadResult> {
    let raw = read_json(path).with_context(|| format!("loading schema {}", path.display()))?;
    let compiled = JSONSchema::compile(&raw)
        .map_err(|err| anyhow!("compiling schema {}: {err}", path.display()))?;
    Ok(SchemaLoadResult { compiled, raw })
}

/// Locate `<table>.schema.json` for a data root.
///
/// A `schema/` directory beside the data root wins so deployments can ship
/// their own schemas; otherwise the copies bundled with the crate are used.
pub(crate) fn resolve_table_schema_path(data_root: &Path, table: &str) -> PathBuf {
    let file_name = format!("{table}.schema.json");
    if let Some(base) = data_root.parent() {
        let candidate = base.join("schema").join(&file_name);
        if candidate.exists() {
            return candidate;
        }
    }

    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("schema")
        .join(file_name)
}

/// Read `<data_root>/<table>.json`, validate it, and deserialize it.
pub(crate) fn load_validated_table<T: DeserializeOwned>(data_root: &Path, table: &str) -> Result<T> {
    let table_path = data_root.join(format!("{table}.json"));
    let value = read_json(&table_path)?;

    let schema_path = resolve_table_schema_path(data_root, table);
    let schema = load_json_schema(&schema_path)?;
    if let Err(errors) = schema.compiled.validate(&value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "{} failed schema validation against {}:\n{}",
            table_path.display(),
            schema_path.display(),
            details
        );
    }

    serde_json::from_value(value).with_context(|| format!("decoding {}", table_path.display()))
}

fn read_json(path: &Path) -> Result<Value> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}
