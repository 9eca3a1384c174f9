use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::provider::ProviderKind;

pub const DEFAULT_CONFIG_FILE: &str = "ideagen.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: String,
    /// Overrides the provider's default endpoint.
    pub api_base: Option<String>,
    pub bind: String,
    pub port: u16,
    pub root: String,
    pub favorites_path: String,
    pub save_transcripts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAI,
            model: "gpt-4o-mini".into(),
            api_base: None,
            bind: "127.0.0.1".into(),
            port: 8787,
            root: ".".into(),
            favorites_path: ".ideagen/favorites.json".into(),
            save_transcripts: false,
        }
    }
}

impl Config {
    /// Load `path` (or `ideagen.toml` when present), then apply `IDEAGEN_*` env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                p.exists().then_some(p)
            }
        };
        let mut cfg = match file {
            Some(p) => {
                let text = fs::read_to_string(&p)?;
                toml::from_str(&text).with_context(|| format!("parse config {}", p.display()))?
            }
            None => Config::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = get("IDEAGEN_PROVIDER") {
            self.provider = v.parse()?;
        }
        if let Some(v) = get("IDEAGEN_MODEL") {
            self.model = v;
        }
        if let Some(v) = get("IDEAGEN_API_BASE") {
            self.api_base = Some(v);
        }
        if let Some(v) = get("IDEAGEN_BIND") {
            self.bind = v;
        }
        if let Some(v) = get("IDEAGEN_PORT") {
            self.port = v.parse().with_context(|| format!("IDEAGEN_PORT={v:?}"))?;
        }
        Ok(())
    }

    pub fn favorites_file(&self) -> PathBuf {
        Path::new(&self.root).join(&self.favorites_path)
    }
}
