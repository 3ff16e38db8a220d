//! Session configuration: `.mender.toml` plus `MENDER_*` environment overrides

use crate::error::{Error, IoContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional per-context configuration file.
pub const CONFIG_FILE: &str = ".mender.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "MENDER_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Document file name inside the context directory.
    pub document: String,
    /// Marker directory for snapshots, created next to the document.
    pub history_dir: String,
    /// Graph cache directory, relative to the context directory unless absolute.
    pub cache_dir: PathBuf,
    /// Lines shown by an unbounded preview.
    pub preview_lines: usize,
    /// Default context radius for search, replace and insert.
    pub context_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            document: "schema.yaml".to_string(),
            history_dir: ".time_machine".to_string(),
            cache_dir: PathBuf::from(".cache").join("schema_graphs"),
            preview_lines: 50,
            context_lines: 2,
        }
    }
}

impl Config {
    /// Load `<context_dir>/.mender.toml` (defaults if absent), then apply
    /// environment overrides.
    pub fn load(context_dir: &Path) -> Result<Self> {
        let path = context_dir.join(CONFIG_FILE);
        let mut config = if path.is_file() {
            Self::from_file(&path)?
        } else {
            Config::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_path(path)?;
        let config: Config = toml::from_str(&text)
            .map_err(|e| Error::invalid(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `MENDER_*` overrides fetched through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("DOCUMENT") {
            self.document = v;
        }
        if let Some(v) = var("HISTORY_DIR") {
            self.history_dir = v;
        }
        if let Some(v) = var("CACHE_DIR") {
            self.cache_dir = PathBuf::from(v);
        }
        if let Some(v) = var("PREVIEW_LINES") {
            self.preview_lines = parse_count("PREVIEW_LINES", &v)?;
        }
        if let Some(v) = var("CONTEXT_LINES") {
            self.context_lines = parse_count("CONTEXT_LINES", &v)?;
        }
        Ok(())
    }

    pub fn document_path(&self, context_dir: &Path) -> PathBuf {
        context_dir.join(&self.document)
    }

    pub fn cache_path(&self, context_dir: &Path) -> PathBuf {
        if self.cache_dir.is_absolute() {
            self.cache_dir.clone()
        } else {
            context_dir.join(&self.cache_dir)
        }
    }
}

fn parse_count(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid(format!("{ENV_PREFIX}{name} must be a non-negative integer, got {value:?}")))
}
