//! dd-runner - Migration execution for dbdelta
//!
//! Reconciles the migration directory against the ledger, runs the selected
//! migrations' statements in order, and records each outcome.

pub mod error;
pub mod runner;

pub use error::{RunnerError, RunnerResult};
pub use runner::{MigrationOutcome, MigrationRunner, MigrationStatus, RunReport};
