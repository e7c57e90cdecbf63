//! dd-db - Database abstraction layer for dbdelta
//!
//! This crate provides the synchronous `Database` trait consumed by the
//! ledger and the migration runner, plus its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
