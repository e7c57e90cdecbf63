//! Migration file store.
//!
//! [`MigrationStore`] owns the migration directory. It lists migration
//! identifiers, reads and parses individual files on demand, and writes new
//! scaffold files. Nothing is cached: every read goes back to disk.

use crate::definition::MigrationDefinition;
use crate::error::{CoreError, CoreResult};
use crate::migration_id::MigrationId;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory of migration files
#[derive(Debug, Clone)]
pub struct MigrationStore {
    dir: PathBuf,
}

impl MigrationStore {
    /// Open the store at `dir`, creating the directory if it does not exist.
    pub fn open(dir: &Path) -> CoreResult<Self> {
        if !dir.is_dir() {
            fs::create_dir_all(dir).map_err(|e| CoreError::MigrationDirUnavailable {
                path: dir.display().to_string(),
                source: e,
            })?;
            log::info!("Created migration directory {}", dir.display());
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// The migration directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `id`
    pub fn path_of(&self, id: &MigrationId) -> PathBuf {
        self.dir.join(id.as_str())
    }

    /// List every migration identifier in the directory.
    ///
    /// Only regular files count. Hidden files (`.gitkeep`, editor swap files)
    /// and names that are not valid UTF-8 are skipped.
    pub fn list_files(&self) -> CoreResult<BTreeSet<MigrationId>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| CoreError::IoWithPath {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let mut ids = BTreeSet::new();
        for entry in entries {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                log::warn!(
                    "Skipping migration file with non UTF-8 name: {}",
                    entry.path().display()
                );
                continue;
            };
            if name.starts_with('.') {
                log::debug!("Skipping hidden file {name} in {}", self.dir.display());
                continue;
            }
            if let Some(id) = MigrationId::try_new(name) {
                ids.insert(id);
            }
        }
        Ok(ids)
    }

    /// Read and parse the definition for `id`
    pub fn read_definition(&self, id: &MigrationId) -> CoreResult<MigrationDefinition> {
        let path = self.path_of(id);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CoreError::MigrationNotFound { id: id.to_string() },
            _ => CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            },
        })?;
        MigrationDefinition::parse(id.as_str(), &content)
    }

    /// Write `content` as the file for `id`.
    ///
    /// An existing file is replaced when `overwrite` is true; otherwise this
    /// fails with [`CoreError::ScaffoldExists`]. Returns the written path.
    pub fn write_scaffold(
        &self,
        id: &MigrationId,
        content: &str,
        overwrite: bool,
    ) -> CoreResult<PathBuf> {
        let path = self.path_of(id);
        if path.exists() {
            if !overwrite {
                return Err(CoreError::ScaffoldExists {
                    path: path.display().to_string(),
                });
            }
            log::warn!("Overwriting existing migration file {}", path.display());
        }
        fs::write(&path, content).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
