//! Selection engine: decides which migrations to run and in what order.
//!
//! The plan is computed from two snapshots, the identifiers on disk and the
//! identifiers recorded in the ledger. Neither snapshot is locked, so two
//! concurrent invocations can compute overlapping plans.

use crate::direction::Direction;
use crate::migration_id::MigrationId;
use std::collections::BTreeSet;

/// Ordered list of migrations to execute for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Direction the selection was computed for
    pub direction: Direction,

    /// Identifiers to execute, in execution order
    pub ids: Vec<MigrationId>,

    /// Explicitly requested identifiers with no file on disk.
    ///
    /// These never affect `ids`; they are surfaced so callers can warn.
    pub unmatched: Vec<String>,
}

impl Selection {
    /// True when nothing qualifies for execution
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Compute the selection for `direction`.
///
/// - `up`: every file not yet applied, ascending.
/// - `down`: every applied migration whose file still exists, descending.
///
/// When `explicit` is non-empty the candidate files are first restricted to
/// those identifiers.
pub fn select(
    direction: Direction,
    files: &BTreeSet<MigrationId>,
    applied: &BTreeSet<MigrationId>,
    explicit: &[String],
) -> Selection {
    let mut unmatched = Vec::new();
    let candidates: BTreeSet<&MigrationId> = if explicit.is_empty() {
        files.iter().collect()
    } else {
        let mut restricted = BTreeSet::new();
        for requested in explicit {
            match files.get(requested.as_str()) {
                Some(id) => {
                    restricted.insert(id);
                }
                None => {
                    if !unmatched.contains(requested) {
                        unmatched.push(requested.clone());
                    }
                }
            }
        }
        restricted
    };

    // BTreeSet iteration is already ascending
    let ids: Vec<MigrationId> = match direction {
        Direction::Up => candidates
            .into_iter()
            .filter(|id| !applied.contains(*id))
            .cloned()
            .collect(),
        Direction::Down => candidates
            .into_iter()
            .rev()
            .filter(|id| applied.contains(*id))
            .cloned()
            .collect(),
    };

    Selection {
        direction,
        ids,
        unmatched,
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
