use super::*;
use dd_db::DuckDbBackend;
use std::fs;
use tempfile::{tempdir, TempDir};

fn patch(up: &[&str], down: &[&str]) -> String {
    let sql = |stmts: &[&str]| {
        stmts
            .iter()
            .map(|s| format!("    <sql><![CDATA[ {s} ]]></sql>\n"))
            .collect::<String>()
    };
    format!(
        "<patch>\n  <up>\n{}  </up>\n  <down>\n{}  </down>\n</patch>\n",
        sql(up),
        sql(down)
    )
}

fn setup(files: &[(&str, String)]) -> (TempDir, MigrationStore, DuckDbBackend) {
    let dir = tempdir().unwrap();
    let store = MigrationStore::open(dir.path()).unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    (dir, store, DuckDbBackend::in_memory().unwrap())
}

fn statuses(report: &RunReport) -> Vec<(&str, &MigrationStatus)> {
    report
        .outcomes
        .iter()
        .map(|o| (o.id.as_str(), &o.status))
        .collect()
}

#[test]
fn test_up_applies_in_order_and_records() {
    let (_dir, store, db) = setup(&[
        (
            "2024-01-02-b.xml",
            patch(&["INSERT INTO log VALUES ('b')"], &[]),
        ),
        (
            "2024-01-01-a.xml",
            patch(&["CREATE TABLE log (name VARCHAR)", "INSERT INTO log VALUES ('a')"], &["DROP TABLE log"]),
        ),
    ]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);

    let report = runner.migrate(Direction::Up, &[]).unwrap();
    assert_eq!(report.applied(), 2);
    assert!(!report.is_aborted());
    assert_eq!(report.outcomes[0].id, "2024-01-01-a.xml");
    assert_eq!(report.outcomes[0].statements_run, 2);
    assert_eq!(report.outcomes[1].id, "2024-01-02-b.xml");

    let rows = db.query_rows("SELECT name FROM log ORDER BY rowid", &[]).unwrap();
    assert_eq!(rows, vec![vec![Some("a".to_string())], vec![Some("b".to_string())]]);
    assert_eq!(ledger.list_applied().unwrap().len(), 2);
}

#[test]
fn test_empty_selection_is_noop() {
    let (_dir, store, db) = setup(&[]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);

    let report = runner.migrate(Direction::Up, &[]).unwrap();
    assert!(report.is_noop());
    assert!(!report.is_aborted());
}

#[test]
fn test_missing_up_statements_skipped_with_warning() {
    let (_dir, store, db) = setup(&[
        ("2024-01-01-a.xml", patch(&[], &["SELECT 1"])),
        ("2024-01-02-b.xml", patch(&["CREATE TABLE b (id INT)"], &[])),
    ]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);

    let report = runner.migrate(Direction::Up, &[]).unwrap();
    let got = statuses(&report);
    assert!(matches!(got[0], ("2024-01-01-a.xml", MigrationStatus::Skipped { .. })));
    assert!(matches!(got[1], ("2024-01-02-b.xml", MigrationStatus::Applied)));
    assert_eq!(report.skipped(), 1);

    let applied = ledger.list_applied().unwrap();
    assert!(!applied.contains("2024-01-01-a.xml"));
    assert!(applied.contains("2024-01-02-b.xml"));
}

#[test]
fn test_malformed_file_skipped_batch_continues() {
    let (_dir, store, db) = setup(&[
        ("2024-01-01-a.xml", "<patch><up><sql>SELECT 1".to_string()),
        ("2024-01-02-b.xml", patch(&["CREATE TABLE b (id INT)"], &[])),
    ]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);

    let report = runner.migrate(Direction::Up, &[]).unwrap();
    match &report.outcomes[0].status {
        MigrationStatus::Skipped { reason } => assert!(reason.contains("could not read sql")),
        other => panic!("expected skip, got {other:?}"),
    }
    assert_eq!(report.applied(), 1);
    assert!(db.relation_exists("b").unwrap());
}

#[test]
fn test_statement_failure_aborts_without_rollback() {
    let (_dir, store, db) = setup(&[
        ("2024-01-01-a.xml", patch(&["CREATE TABLE a (id INT)"], &[])),
        (
            "2024-01-02-b.xml",
            patch(&["CREATE TABLE b (id INT)", "INSERT INTO nowhere VALUES (1)"], &[]),
        ),
        ("2024-01-03-c.xml", patch(&["CREATE TABLE c (id INT)"], &[])),
    ]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);

    let report = runner.migrate(Direction::Up, &[]).unwrap();
    assert!(report.is_aborted());
    assert_eq!(report.outcomes.len(), 2);

    let failure = report.failure().unwrap();
    assert_eq!(failure.id, "2024-01-02-b.xml");
    assert_eq!(failure.statements_run, 1);
    match &failure.status {
        MigrationStatus::Failed { statement, .. } => {
            assert_eq!(statement, "INSERT INTO nowhere VALUES (1)")
        }
        other => panic!("expected failure, got {other:?}"),
    }

    // First statement of b stays applied; c never ran
    assert!(db.relation_exists("b").unwrap());
    assert!(!db.relation_exists("c").unwrap());

    let applied = ledger.list_applied().unwrap();
    assert!(applied.contains("2024-01-01-a.xml"));
    assert!(!applied.contains("2024-01-02-b.xml"));
}

#[test]
fn test_down_reverts_descending_and_clears_ledger() {
    let (_dir, store, db) = setup(&[
        (
            "2024-01-01-a.xml",
            patch(&["CREATE TABLE a (id INT)"], &["DROP TABLE a"]),
        ),
        (
            "2024-01-02-b.xml",
            patch(&["CREATE TABLE b (id INT)"], &["DROP TABLE b"]),
        ),
    ]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);
    runner.migrate(Direction::Up, &[]).unwrap();

    let report = runner.migrate(Direction::Down, &[]).unwrap();
    let order: Vec<&str> = report.outcomes.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(order, vec!["2024-01-02-b.xml", "2024-01-01-a.xml"]);
    assert_eq!(report.applied(), 2);
    assert!(ledger.list_applied().unwrap().is_empty());
    assert!(!db.relation_exists("a").unwrap());
}

#[test]
fn test_explicit_subset_runs_only_named() {
    let (_dir, store, db) = setup(&[
        ("2024-01-01-a.xml", patch(&["CREATE TABLE a (id INT)"], &[])),
        ("2024-01-02-b.xml", patch(&["CREATE TABLE b (id INT)"], &[])),
    ]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);

    let explicit = vec!["2024-01-02-b.xml".to_string(), "2024-09-09-ghost.xml".to_string()];
    let report = runner.migrate(Direction::Up, &explicit).unwrap();
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].id, "2024-01-02-b.xml");
    assert_eq!(report.unmatched, vec!["2024-09-09-ghost.xml".to_string()]);
    assert!(!db.relation_exists("a").unwrap());
}

#[test]
fn test_run_with_reports_each_outcome() {
    let (_dir, store, db) = setup(&[
        ("2024-01-01-a.xml", patch(&["SELECT 1"], &[])),
        ("2024-01-02-b.xml", patch(&[], &[])),
    ]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);

    let selection = runner.plan(Direction::Up, &[]).unwrap();
    let mut seen = Vec::new();
    runner
        .run_with(&selection, |o| seen.push(o.id.to_string()))
        .unwrap();
    assert_eq!(seen, vec!["2024-01-01-a.xml", "2024-01-02-b.xml"]);
}

#[test]
fn test_integrity_error_is_fatal() {
    let (_dir, store, db) = setup(&[("2024-01-01-a.xml", patch(&["SELECT 1"], &[]))]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);

    // A stale plan: the ledger gains the entry after planning
    let selection = runner.plan(Direction::Up, &[]).unwrap();
    ledger
        .record_applied(&MigrationId::new("2024-01-01-a.xml"))
        .unwrap();

    let err = runner.run(&selection).unwrap_err();
    assert!(matches!(
        err,
        crate::RunnerError::Ledger(dd_ledger::LedgerError::Integrity { .. })
    ));
}

#[test]
fn test_down_without_ledger_entry_still_succeeds() {
    let (_dir, store, db) = setup(&[(
        "2024-01-01-a.xml",
        patch(&["SELECT 1"], &["SELECT 2"]),
    )]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);

    let selection = Selection {
        direction: Direction::Down,
        ids: vec![MigrationId::new("2024-01-01-a.xml")],
        unmatched: Vec::new(),
    };
    let report = runner.run(&selection).unwrap();
    assert_eq!(report.applied(), 1);
}

#[test]
fn test_overlong_id_skipped_before_any_statement() {
    let name = format!("2024-01-01-{}.xml", "x".repeat(130));
    let (_dir, store, db) = setup(&[
        (name.as_str(), patch(&["CREATE TABLE t (id INT)"], &["DROP TABLE t"])),
        ("2024-01-02-b.xml", patch(&["CREATE TABLE b (id INT)"], &[])),
    ]);
    let ledger = Ledger::open(&db, "db_delta").unwrap();
    let runner = MigrationRunner::new(&store, &ledger, &db);

    let report = runner.migrate(Direction::Up, &[]).unwrap();
    match &report.outcomes[0].status {
        MigrationStatus::Skipped { reason } => assert!(reason.contains("L002"), "{reason}"),
        other => panic!("expected skip, got {other:?}"),
    }
    assert_eq!(report.outcomes[0].statements_run, 0);
    assert!(!db.relation_exists("t").unwrap());

    let applied = ledger.list_applied().unwrap();
    assert!(!applied.contains(name.as_str()));
    assert!(applied.contains("2024-01-02-b.xml"));

    // A second run skips it again instead of failing on an existing table
    let again = runner.migrate(Direction::Up, &[]).unwrap();
    assert!(!again.is_aborted());
    assert_eq!(again.skipped(), 1);
}
