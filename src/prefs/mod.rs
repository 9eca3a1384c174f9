use anyhow::{bail, Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Business, audience, content and brand settings owned by the settings
/// subsystem. Opaque here: any JSON object is accepted and embedded in the
/// prompt exactly as given, unknown keys and odd value types included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferencesRecord(Map<String, Value>);

impl PreferencesRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Compact JSON text of the whole record, key order preserved.
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for PreferencesRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Load a record from `.json`, `.yaml`/`.yml` or `.toml`, picked by extension.
/// The document must be an object (a mapping / table) at the top level.
pub fn load(path: &Path) -> Result<PreferencesRecord> {
    let text = fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let value: Value = match ext.as_str() {
        "json" => serde_json::from_str(&text)
            .with_context(|| format!("parse preferences json {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_str(&text)
            .with_context(|| format!("parse preferences yaml {}", path.display()))?,
        "toml" => toml::from_str(&text)
            .with_context(|| format!("parse preferences toml {}", path.display()))?,
        other => bail!("unsupported preferences file extension {:?} ({})", other, path.display()),
    };
    match value {
        Value::Object(map) => Ok(map.into()),
        _ => bail!("preferences in {} must be an object at the top level", path.display()),
    }
}
