//! Configuration types and parsing for dbdelta.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of the ledger table; `table_prefix` is prepended to it.
pub const LEDGER_TABLE_BASE: &str = "db_delta";

/// Project configuration from dbdelta.yml
///
/// Every field has a default, so a project without a config file behaves as
/// if an empty file were present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding migration files, relative to the project root
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Prefix for the ledger table name (`<prefix>db_delta`)
    #[serde(default)]
    pub table_prefix: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Whether `create` may replace an existing file with the same name
    #[serde(default = "default_true")]
    pub overwrite_scaffolds: bool,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            table_prefix: String::new(),
            database: DatabaseConfig::default(),
            overwrite_scaffolds: true,
        }
    }
}

fn default_migrations_dir() -> String {
    "dbdelta".to_string()
}

fn default_db_path() -> String {
    "dbdelta.duckdb".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        // An empty file deserializes to unit, not a mapping
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for dbdelta.yml or dbdelta.yaml and falls back to defaults when
    /// neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("dbdelta.yml");
        let yaml_path = dir.join("dbdelta.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            log::debug!(
                "No dbdelta.yml in {}, using default configuration",
                dir.display()
            );
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        // The prefix is spliced into DDL, so keep it to identifier characters
        if !self
            .table_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
            || self.table_prefix.starts_with(|c: char| c.is_ascii_digit())
        {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "table_prefix '{}' may only contain ASCII letters, digits, and '_', and must not start with a digit",
                    self.table_prefix
                ),
            });
        }
        Ok(())
    }

    /// Full name of the ledger table
    pub fn ledger_table(&self) -> String {
        format!("{}{}", self.table_prefix, LEDGER_TABLE_BASE)
    }

    /// Migration directory resolved against the project root
    pub fn migrations_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    /// Database path resolved against the project root (`:memory:` passes through)
    pub fn database_path(&self, root: &Path) -> String {
        if self.database.path == ":memory:" || Path::new(&self.database.path).is_absolute() {
            self.database.path.clone()
        } else {
            root.join(&self.database.path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
