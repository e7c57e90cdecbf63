//! History ledger for dbdelta.
//!
//! Records which migrations have been applied, and when, in a dedicated table
//! (`db_delta` by default). The ledger is the single source of truth for
//! "has this migration run".

pub mod error;
pub mod ledger;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{check_id, Ledger, LedgerEntry, MAX_ID_LEN};
