//! Migration execution

use crate::error::RunnerResult;
use dd_core::{select, Direction, MigrationId, MigrationStore, Selection};
use dd_db::Database;
use dd_ledger::{check_id, Ledger};
use std::time::{Duration, Instant};

/// Terminal state of one migration in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationStatus {
    /// All statements ran and the ledger was updated
    Applied,

    /// Nothing ran: the file was unreadable or had no statements for the
    /// direction. The run continues with the next migration.
    Skipped { reason: String },

    /// A statement was rejected by the database. The run stops here;
    /// statements that already ran are not rolled back.
    Failed { statement: String, error: String },
}

/// Result of a single migration
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    /// Migration identifier
    pub id: MigrationId,

    /// Terminal state
    pub status: MigrationStatus,

    /// Statements executed successfully
    pub statements_run: usize,

    /// Execution time
    pub duration: Duration,
}

impl MigrationOutcome {
    fn skipped(id: &MigrationId, reason: String, duration: Duration) -> Self {
        Self {
            id: id.clone(),
            status: MigrationStatus::Skipped { reason },
            statements_run: 0,
            duration,
        }
    }
}

/// Summary of one `up` or `down` invocation
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Direction that was run
    pub direction: Direction,

    /// One outcome per migration attempted, in execution order
    pub outcomes: Vec<MigrationOutcome>,

    /// Explicitly requested identifiers with no file on disk
    pub unmatched: Vec<String>,

    /// Total execution time
    pub duration: Duration,
}

impl RunReport {
    /// Migrations applied (or reverted, for `down`)
    pub fn applied(&self) -> usize {
        self.count(|s| matches!(s, MigrationStatus::Applied))
    }

    /// Migrations skipped with a warning
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, MigrationStatus::Skipped { .. }))
    }

    /// The failing migration, if the run was aborted
    pub fn failure(&self) -> Option<&MigrationOutcome> {
        self.outcomes
            .iter()
            .find(|o| matches!(o.status, MigrationStatus::Failed { .. }))
    }

    /// True when a statement failure stopped the run
    pub fn is_aborted(&self) -> bool {
        self.failure().is_some()
    }

    /// True when nothing qualified for execution
    pub fn is_noop(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn count(&self, pred: impl Fn(&MigrationStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Runs migrations from a store against an injected database and ledger
pub struct MigrationRunner<'a> {
    store: &'a MigrationStore,
    ledger: &'a Ledger<'a>,
    db: &'a dyn Database,
}

impl<'a> MigrationRunner<'a> {
    /// Create a new migration runner
    pub fn new(store: &'a MigrationStore, ledger: &'a Ledger<'a>, db: &'a dyn Database) -> Self {
        Self { store, ledger, db }
    }

    /// Compute the ordered selection for `direction`.
    ///
    /// `explicit` restricts the candidates to the named identifiers; names
    /// with no file on disk end up in [`Selection::unmatched`].
    pub fn plan(&self, direction: Direction, explicit: &[String]) -> RunnerResult<Selection> {
        let files = self.store.list_files()?;
        let applied = self.ledger.list_applied()?;
        let selection = select(direction, &files, &applied, explicit);
        for missing in &selection.unmatched {
            log::warn!("{direction}: no migration file named {missing}, ignoring");
        }
        log::debug!(
            "{direction}: {} file(s), {} applied, {} selected",
            files.len(),
            applied.len(),
            selection.ids.len()
        );
        Ok(selection)
    }

    /// Plan and run in one step
    pub fn migrate(&self, direction: Direction, explicit: &[String]) -> RunnerResult<RunReport> {
        let selection = self.plan(direction, explicit)?;
        self.run(&selection)
    }

    /// Run every migration in `selection`
    pub fn run(&self, selection: &Selection) -> RunnerResult<RunReport> {
        self.run_with(selection, |_| {})
    }

    /// Run every migration in `selection`, calling `on_outcome` as soon as
    /// each one finishes.
    ///
    /// Stops after the first [`MigrationStatus::Failed`] outcome. Ledger
    /// errors are returned as `Err`; outcomes already delivered through
    /// `on_outcome` stay valid.
    pub fn run_with<F>(&self, selection: &Selection, mut on_outcome: F) -> RunnerResult<RunReport>
    where
        F: FnMut(&MigrationOutcome),
    {
        let start = Instant::now();
        let direction = selection.direction;
        let mut outcomes = Vec::with_capacity(selection.ids.len());

        for id in &selection.ids {
            let outcome = self.execute_one(direction, id);
            on_outcome(&outcome);

            match &outcome.status {
                MigrationStatus::Applied => self.record(direction, id)?,
                MigrationStatus::Skipped { reason } => {
                    log::warn!("{direction}: skipped {id}: {reason}");
                }
                MigrationStatus::Failed { error, .. } => {
                    log::error!("{direction}: {id} failed, stopping: {error}");
                }
            }

            let stop = matches!(outcome.status, MigrationStatus::Failed { .. });
            outcomes.push(outcome);
            if stop {
                break;
            }
        }

        Ok(RunReport {
            direction,
            outcomes,
            unmatched: selection.unmatched.clone(),
            duration: start.elapsed(),
        })
    }

    /// Read one migration and run its statements for `direction`
    fn execute_one(&self, direction: Direction, id: &MigrationId) -> MigrationOutcome {
        let start = Instant::now();

        if direction == Direction::Up {
            if let Err(e) = check_id(id) {
                return MigrationOutcome::skipped(id, e.to_string(), start.elapsed());
            }
        }

        let definition = match self.store.read_definition(id) {
            Ok(definition) => definition,
            Err(e) => {
                return MigrationOutcome::skipped(
                    id,
                    format!("could not read sql: {e}"),
                    start.elapsed(),
                )
            }
        };

        let statements = definition.statements(direction);
        if statements.is_empty() {
            return MigrationOutcome::skipped(
                id,
                format!("no <sql> statements in <{direction}>"),
                start.elapsed(),
            );
        }

        log::info!("{direction}: running {id} ({} statement(s))", statements.len());
        let mut statements_run = 0;
        for statement in statements {
            log::debug!("{id}: {statement}");
            if let Err(e) = self.db.execute_batch(statement) {
                return MigrationOutcome {
                    id: id.clone(),
                    status: MigrationStatus::Failed {
                        statement: statement.clone(),
                        error: e.to_string(),
                    },
                    statements_run,
                    duration: start.elapsed(),
                };
            }
            statements_run += 1;
        }

        MigrationOutcome {
            id: id.clone(),
            status: MigrationStatus::Applied,
            statements_run,
            duration: start.elapsed(),
        }
    }

    fn record(&self, direction: Direction, id: &MigrationId) -> RunnerResult<()> {
        match direction {
            Direction::Up => self.ledger.record_applied(id)?,
            Direction::Down => {
                if !self.ledger.record_reverted(id)? {
                    log::warn!("down: {id} had no ledger entry to remove");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
