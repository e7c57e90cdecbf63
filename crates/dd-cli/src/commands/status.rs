//! Status command implementation

use anyhow::{Context, Result};
use dd_core::MigrationId;
use dd_ledger::LedgerEntry;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::context::RuntimeContext;

/// Where a migration stands relative to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MigrationState {
    /// File on disk, recorded in the ledger
    Applied,
    /// File on disk, not in the ledger
    Pending,
    /// In the ledger, file no longer on disk
    Missing,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationState::Applied => write!(f, "applied"),
            MigrationState::Pending => write!(f, "pending"),
            MigrationState::Missing => write!(f, "missing"),
        }
    }
}

/// One line of status output
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusRow {
    id: String,
    state: MigrationState,
    applied_at: Option<String>,
}

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let files = ctx
        .store
        .list_files()
        .context("Failed to list migration files")?;
    let entries = ctx
        .ledger()?
        .list_entries()
        .context("Failed to read ledger")?;

    let rows = collect_status(&files, &entries);
    match args.output {
        StatusOutput::Table => print_table(&rows),
        StatusOutput::Json => print_json(&rows)?,
    }
    Ok(())
}

/// Merge files on disk with ledger entries, ordered by identifier
pub(crate) fn collect_status(
    files: &BTreeSet<MigrationId>,
    entries: &[LedgerEntry],
) -> Vec<StatusRow> {
    let mut rows: BTreeMap<&str, StatusRow> = files
        .iter()
        .map(|id| {
            (
                id.as_str(),
                StatusRow {
                    id: id.to_string(),
                    state: MigrationState::Pending,
                    applied_at: None,
                },
            )
        })
        .collect();

    for entry in entries {
        let applied_at = entry
            .applied_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string());
        match rows.get_mut(entry.id.as_str()) {
            Some(row) => {
                row.state = MigrationState::Applied;
                row.applied_at = applied_at;
            }
            None => {
                rows.insert(
                    entry.id.as_str(),
                    StatusRow {
                        id: entry.id.to_string(),
                        state: MigrationState::Missing,
                        applied_at,
                    },
                );
            }
        }
    }

    rows.into_values().collect()
}

/// Print status in table format
fn print_table(rows: &[StatusRow]) {
    if rows.is_empty() {
        println!("No migrations found.");
        return;
    }

    let id_width = rows.iter().map(|r| r.id.len()).max().unwrap_or(2).max(2);
    let state_width = 7;

    println!(
        "{:<id_width$}  {:<state_width$}  APPLIED_AT",
        "ID", "STATE"
    );
    println!("{:-<id_width$}  {:-<state_width$}  {}", "", "", "-".repeat(19));

    for row in rows {
        println!(
            "{:<id_width$}  {:<state_width$}  {}",
            row.id,
            row.state.to_string(),
            row.applied_at.as_deref().unwrap_or("-")
        );
    }

    let count = |state| rows.iter().filter(|r| r.state == state).count();
    println!();
    println!(
        "{} applied, {} pending, {} missing",
        count(MigrationState::Applied),
        count(MigrationState::Pending),
        count(MigrationState::Missing)
    );
}

/// Print status in JSON format
fn print_json(rows: &[StatusRow]) -> Result<()> {
    let json = serde_json::to_string_pretty(rows).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
