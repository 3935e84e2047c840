//! The database file a command reads and writes.
//!
//! `--db` wins over the config file's `database.path`. A missing file loads
//! as an empty database so that the first `add` creates it.

use anyhow::{Context, Result};
use colored::Colorize;
use noterand_core::persist;
use noterand_core::Database;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// The database file and settings every command works against.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub path: PathBuf,
    pub config: Config,
}

impl Workspace {
    pub fn new(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Reads the config and picks the database file, `--db` first.
    pub fn resolve(db: Option<&Path>, config: Option<&Path>) -> Self {
        let (config, warning) = Config::load_or_default(config);
        if let Some(warning) = warning {
            eprintln!("{} {}", "!".yellow(), warning);
        }
        let path = db
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.database.path.clone());
        Self::new(path, config)
    }

    /// Loads the database file; a file that does not exist yet is empty.
    pub fn load(&self) -> Result<Database> {
        if !self.path.exists() {
            return Ok(Database::new());
        }
        persist::load(&self.path)
            .with_context(|| format!("Failed to load database: {}", self.path.display()))
    }

    pub fn save(&self, db: &Database) -> Result<()> {
        persist::save(db, &self.path)
            .with_context(|| format!("Failed to save database: {}", self.path.display()))
    }
}
