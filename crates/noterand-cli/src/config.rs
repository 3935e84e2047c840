//! Configuration file for the noterand CLI.
//!
//! Settings live in a JSON file (`noterand.json` by default). Every field is
//! optional; anything missing takes its default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "noterand.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub production: ProductionConfig,
    pub database: DatabaseConfig,
}

/// Settings for `produce`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    /// Pattern file to write (default: output.txt)
    pub filename: PathBuf,
    /// Overwrite an existing pattern file without asking
    pub overwrite: bool,
    /// Lines per pattern; 0 asks every time
    pub lines: usize,
    /// Patterns per produce; 0 asks whether to produce again after each one
    pub runs: usize,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::from("output.txt"),
            overwrite: false,
            lines: 0,
            runs: 0,
        }
    }
}

/// Settings for the database file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file every command reads and writes (default: noterand-db.json)
    pub path: PathBuf,
    /// Database file appended by `init`
    pub load: Option<PathBuf>,
    /// Replace an existing database file on `init` without asking
    pub overwrite: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("noterand-db.json"),
            load: None,
            overwrite: false,
        }
    }
}

impl Config {
    /// Parse a config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Loads the config, falling back to defaults.
    ///
    /// A missing default config file is silent. An unreadable or malformed
    /// file, or a missing file named explicitly, yields defaults plus a
    /// warning for the caller to print.
    pub fn load_or_default(path: Option<&Path>) -> (Self, Option<String>) {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };
        if !explicit && !path.exists() {
            return (Self::default(), None);
        }
        match Self::from_file(path) {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(format!("{:#}; using default settings", e)),
            ),
        }
    }
}
