//! Ledger table access.
//!
//! Table layout:
//!
//! ```sql
//! CREATE TABLE <prefix>db_delta (
//!     patch_id VARCHAR(128) NOT NULL PRIMARY KEY,
//!     date_run TIMESTAMP DEFAULT current_timestamp
//! )
//! ```
//!
//! The table name is validated once and then interpolated; every value is
//! bound as a parameter.

use crate::error::{LedgerError, LedgerResult};
use chrono::{NaiveDateTime, Utc};
use dd_core::MigrationId;
use dd_db::{Database, DbError};
use serde::Serialize;
use std::collections::BTreeSet;

/// Width of the `patch_id` column
pub const MAX_ID_LEN: usize = 128;

/// Reject identifiers that do not fit the `patch_id` column.
///
/// Callers check this before running a migration's statements, so an id the
/// ledger cannot hold is never executed.
pub fn check_id(id: &MigrationId) -> LedgerResult<()> {
    if id.as_str().chars().count() > MAX_ID_LEN {
        return Err(LedgerError::IdTooLong {
            id: id.to_string(),
            max: MAX_ID_LEN,
        });
    }
    Ok(())
}

/// DuckDB renders `TIMESTAMP` as text in this shape; the fraction is optional
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// DuckDB stores microseconds, so never write more than six digits
const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One applied migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Migration identifier
    pub id: MigrationId,

    /// When the migration was applied (UTC), if the row carries a timestamp
    pub applied_at: Option<NaiveDateTime>,
}

/// History ledger over an injected database handle
pub struct Ledger<'a> {
    db: &'a dyn Database,
    table: String,
}

impl<'a> Ledger<'a> {
    /// Create a ledger backed by `table`. Does not touch the database.
    pub fn new(db: &'a dyn Database, table: impl Into<String>) -> LedgerResult<Self> {
        let table = table.into();
        if table.is_empty()
            || table.starts_with(|c: char| c.is_ascii_digit())
            || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(LedgerError::InvalidTableName(table));
        }
        Ok(Self { db, table })
    }

    /// Create a ledger and make sure its table exists
    pub fn open(db: &'a dyn Database, table: impl Into<String>) -> LedgerResult<Self> {
        let ledger = Self::new(db, table)?;
        ledger.ensure_initialized()?;
        Ok(ledger)
    }

    /// Name of the ledger table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the ledger table if it does not already exist. Idempotent.
    pub fn ensure_initialized(&self) -> LedgerResult<()> {
        self.db.execute(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 patch_id VARCHAR({MAX_ID_LEN}) NOT NULL PRIMARY KEY,
                 date_run TIMESTAMP DEFAULT current_timestamp
             )",
            self.table
        ))?;
        log::debug!("Ledger table {} ready on {}", self.table, self.db.db_type());
        Ok(())
    }

    /// Every identifier currently recorded as applied
    pub fn list_applied(&self) -> LedgerResult<BTreeSet<MigrationId>> {
        let rows = self
            .db
            .query_rows(&format!("SELECT patch_id FROM {}", self.table), &[])?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next().flatten())
            .filter_map(MigrationId::try_new)
            .collect())
    }

    /// Every ledger row, ordered by identifier
    pub fn list_entries(&self) -> LedgerResult<Vec<LedgerEntry>> {
        let rows = self.db.query_rows(
            &format!(
                "SELECT patch_id, CAST(date_run AS VARCHAR) FROM {} ORDER BY patch_id",
                self.table
            ),
            &[],
        )?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let mut cols = row.into_iter();
            let Some(id) = cols.next().flatten().and_then(MigrationId::try_new) else {
                continue;
            };
            let applied_at = cols.next().flatten().and_then(|raw| {
                NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
                    .map_err(|e| log::warn!("Unreadable date_run '{raw}' for {id}: {e}"))
                    .ok()
            });
            entries.push(LedgerEntry { id, applied_at });
        }
        Ok(entries)
    }

    /// Record `id` as applied now.
    ///
    /// Fails with [`LedgerError::Integrity`] if `id` is already recorded.
    pub fn record_applied(&self, id: &MigrationId) -> LedgerResult<()> {
        check_id(id)?;
        let now = Utc::now().naive_utc().format(WRITE_FORMAT).to_string();
        self.db
            .execute_with_params(
                &format!(
                    "INSERT INTO {} (patch_id, date_run) VALUES (?, CAST(? AS TIMESTAMP))",
                    self.table
                ),
                &[id.as_str(), now.as_str()],
            )
            .map_err(|e| match e {
                DbError::ConstraintViolation(_) => LedgerError::Integrity { id: id.to_string() },
                other => LedgerError::Db(other),
            })?;
        log::debug!("Ledger: recorded {id}");
        Ok(())
    }

    /// Remove the entry for `id`.
    ///
    /// Returns `false` when there was no entry to remove; callers treat that
    /// as a warning, not a failure.
    pub fn record_reverted(&self, id: &MigrationId) -> LedgerResult<bool> {
        let removed = self.db.execute_with_params(
            &format!("DELETE FROM {} WHERE patch_id = ?", self.table),
            &[id.as_str()],
        )?;
        log::debug!("Ledger: removed {removed} row(s) for {id}");
        Ok(removed > 0)
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
