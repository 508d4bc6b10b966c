//! Optional configuration loaded from beside the manifest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::flags::DEFAULT_FLAG;
use crate::manifest::DEFAULT_MANIFEST_FILE;

/// File name of the configuration looked up next to the manifest.
pub const DEFAULT_CONFIG_FILE: &str = "wit-paths.config.json";

/// Discoverable settings for a WIT path extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractorConfig {
    /// File name of the manifest listing packages and their WIT paths.
    pub manifest_file: String,
    /// Flag printed in front of every resolved path.
    pub flag: String,
    /// Extra directories searched for packages after the `node_modules` hierarchy.
    pub node_path: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            manifest_file: DEFAULT_MANIFEST_FILE.into(),
            flag: DEFAULT_FLAG.into(),
            node_path: Vec::new(),
        }
    }
}

impl ExtractorConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// A missing or unparsable file yields the defaults so a bare manifest keeps working.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if !candidate.exists() {
            return Self::default();
        }
        Self::from_path(&candidate).unwrap_or_else(|| {
            log::warn!(
                "ignoring unreadable configuration {}",
                candidate.display()
            );
            Self::default()
        })
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::load(path).ok()
    }

    /// Read configuration from a specific JSON file, keeping the failure cause.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse configuration {}", path.display()))
    }

    /// Manifest path inside `dir`.
    pub fn manifest_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.manifest_file)
    }

    /// Extra search directories, relative entries anchored at `dir`.
    pub fn node_path_dirs(&self, dir: &Path) -> Vec<PathBuf> {
        self.node_path.iter().map(|entry| dir.join(entry)).collect()
    }
}
