//! Up and down command implementation

use anyhow::{Context, Result};
use dd_core::Direction;
use dd_runner::{MigrationOutcome, MigrationRunner, MigrationStatus, RunReport};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{format_duration, plural, ExitCode};
use crate::context::RuntimeContext;

/// Execute `up` or `down`
pub fn execute(direction: Direction, args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let ledger = ctx.ledger()?;
    let runner = MigrationRunner::new(&ctx.store, &ledger, &ctx.db);

    let selection = runner
        .plan(direction, &args.ids)
        .context("Failed to plan migrations")?;

    for missing in &selection.unmatched {
        println!("  ! {missing} - no such migration file, ignored");
    }

    if selection.is_empty() {
        println!("No patches to run.");
        return Ok(());
    }

    println!(
        "Running {} ({direction})...\n",
        plural(selection.ids.len(), "migration")
    );

    let report = runner
        .run_with(&selection, print_outcome)
        .context("Failed to update ledger")?;

    println!();
    print_summary(&report);

    if report.is_aborted() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

fn print_outcome(outcome: &MigrationOutcome) {
    let elapsed = format_duration(outcome.duration);
    match &outcome.status {
        MigrationStatus::Applied => println!("  ✓ {} ({elapsed})", outcome.id),
        MigrationStatus::Skipped { reason } => println!("  ! {} - {reason}", outcome.id),
        MigrationStatus::Failed { statement, error } => {
            println!("  ✗ {} - {error}", outcome.id);
            eprintln!("    statement: {statement}");
        }
    }
}

fn print_summary(report: &RunReport) {
    let label = report.direction.completion_label();
    let applied = report.applied();
    let skipped = report.skipped();

    if let Some(failed) = report.failure() {
        println!(
            "{label} aborted at {}: {} completed, {} skipped; remaining migrations not run",
            failed.id,
            plural(applied, "migration"),
            skipped
        );
    } else {
        println!(
            "{label} complete: {} in {}, {} skipped",
            plural(applied, "migration"),
            format_duration(report.duration),
            skipped
        );
    }
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
