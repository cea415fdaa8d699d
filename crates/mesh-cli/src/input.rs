//! Loading the declaration file and the optional config file.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use mesh_engine::{Declaration, MeshConfig};

/// Parse a YAML mapping of `identity -> { name, availability }`.
pub fn parse_declarations(yaml: &str) -> Result<BTreeMap<String, Declaration>> {
    let declarations: BTreeMap<String, Declaration> =
        serde_yaml::from_str(yaml).context("Failed to parse schedule YAML")?;

    for identity in declarations.keys() {
        if !identity.contains('@') {
            bail!("Participant key '{}' is not an email address", identity);
        }
    }

    Ok(declarations)
}

pub fn read_declarations(path: &Path) -> Result<BTreeMap<String, Declaration>> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule file: {}", path.display()))?;
    parse_declarations(&yaml).with_context(|| format!("Invalid schedule file: {}", path.display()))
}

/// Load a TOML config file; missing keys fall back to the defaults.
pub fn read_config(path: &Path) -> Result<MeshConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config file: {}", path.display()))
}
