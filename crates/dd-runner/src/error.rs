//! Error types for dd-runner

use dd_core::CoreError;
use dd_ledger::LedgerError;
use thiserror::Error;

/// Errors that stop a run before or between migrations.
///
/// A failing migration statement is not one of these: it ends the run with
/// a [`MigrationStatus::Failed`](crate::MigrationStatus::Failed) outcome.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Migration directory could not be listed (R001)
    #[error("[R001] Could not list migrations: {0}")]
    Store(#[from] CoreError),

    /// Ledger read or write failed (R002)
    #[error("[R002] {0}")]
    Ledger(#[from] LedgerError),
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
