use chrono::DateTime;
use feedback_portal::db;
use feedback_portal::db::migrate::{pending_migrations, run_pending_migrations};

mod common;
use common::memory_db;

#[test]
fn test_migration_rows_use_audit_timestamps() {
    let pool = memory_db();
    db::log::ttlog(&pool.conn, "create", "subject:x", "Chemistry").unwrap();

    let log = db::log::load_log(&pool.conn, None).unwrap();
    let migrations: Vec<_> = log
        .iter()
        .filter(|l| l.operation == "migration_applied")
        .collect();
    assert!(!migrations.is_empty());

    // same RFC 3339 local format as every other audit line
    for entry in &log {
        assert!(
            DateTime::parse_from_rfc3339(&entry.date).is_ok(),
            "{}: {}",
            entry.operation,
            entry.date
        );
    }
}

#[test]
fn test_rerun_applies_nothing() {
    let pool = memory_db();
    assert!(pending_migrations(&pool.conn).unwrap().is_empty());
    assert_eq!(run_pending_migrations(&pool.conn).unwrap(), 0);
}
