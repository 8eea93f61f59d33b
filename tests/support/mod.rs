#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use storefront_catalog::{Storefront, StorefrontConfig};
use tempfile::TempDir;

pub fn bundled_data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

pub fn bundled_storefront() -> Storefront {
    Storefront::load(&StorefrontConfig::new(bundled_data_root()))
        .expect("bundled data must load")
}

pub fn storefront_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_storefront"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// A scratch data root seeded with the bundled tables.
///
/// The directory is laid out as `<tmp>/data`, so the bundled schemas are used
/// unless a test writes `<tmp>/schema/` itself.
pub struct ScratchData {
    pub dir: TempDir,
}

impl ScratchData {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let data = dir.path().join("data");
        fs::create_dir_all(&data)?;
        for entry in fs::read_dir(bundled_data_root())? {
            let entry = entry?;
            fs::copy(entry.path(), data.join(entry.file_name()))?;
        }
        Ok(Self { dir })
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn write_table(&self, table: &str, value: &Value) -> Result<()> {
        write_json(&self.root().join(format!("{table}.json")), value)
    }
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}
