//! Database trait definition

use crate::error::DbResult;

/// Database abstraction for dbdelta.
///
/// All calls block until the database answers. Implementations are used from
/// a single thread and are borrowed (`&dyn Database`) by the ledger and the
/// runner for the length of one invocation.
pub trait Database {
    /// Execute a single SQL statement, returns affected rows
    fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple `;`-separated SQL statements
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute a single statement with positional `?` parameters bound as text
    fn execute_with_params(&self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Run a query with positional `?` parameters and return every row with
    /// each column rendered as a string (`NULL` becomes `None`)
    fn query_rows(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Vec<Option<String>>>>;

    /// Check if a table or view exists
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
