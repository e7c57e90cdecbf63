//! Error types for the history ledger.

use dd_db::DbError;
use thiserror::Error;

/// History ledger errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Ledger table name is not a plain SQL identifier (L001).
    #[error("[L001] Invalid ledger table name '{0}': use ASCII letters, digits, and '_'")]
    InvalidTableName(String),

    /// Migration identifier does not fit the `patch_id` column (L002).
    #[error("[L002] Migration id '{id}' is longer than {max} characters")]
    IdTooLong { id: String, max: usize },

    /// Migration is already recorded as applied (L003).
    #[error("[L003] Ledger integrity error: '{id}' is already recorded as applied")]
    Integrity { id: String },

    /// Underlying database error (L004).
    #[error("[L004] Ledger query failed: {0}")]
    Db(#[from] DbError),
}

/// Result type alias for [`LedgerError`].
pub type LedgerResult<T> = Result<T, LedgerError>;
