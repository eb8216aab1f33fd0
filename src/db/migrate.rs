use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

/// Ensure that the `log` table exists; applied migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250601_0001_create_portal_schema",
        description: "Created users, profiles, sessions, batches, subjects, timetables and feedback",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS batches (
            id         TEXT PRIMARY KEY,
            name       TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS profiles (
            id              TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            email           TEXT NOT NULL,
            first_name      TEXT,
            last_name       TEXT,
            avatar_url      TEXT,
            is_admin        INTEGER NOT NULL DEFAULT 0,
            batch_id        TEXT REFERENCES batches(id) ON DELETE SET NULL,
            semester_number INTEGER CHECK (semester_number BETWEEN 1 AND 8),
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token      TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS subjects (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL,
            period          INTEGER,
            batch_id        TEXT REFERENCES batches(id) ON DELETE CASCADE,
            semester_number INTEGER CHECK (semester_number BETWEEN 1 AND 8),
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS timetables (
            id              TEXT PRIMARY KEY,
            day_of_week     INTEGER NOT NULL CHECK (day_of_week BETWEEN 1 AND 7),
            class_id        TEXT NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
            batch_id        TEXT REFERENCES batches(id) ON DELETE CASCADE,
            semester_number INTEGER CHECK (semester_number BETWEEN 1 AND 8),
            start_time      TEXT NOT NULL,
            end_time        TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS feedback (
            id                          TEXT PRIMARY KEY,
            student_id                  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            class_id                    TEXT NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
            batch_id                    TEXT REFERENCES batches(id) ON DELETE SET NULL,
            semester_number             INTEGER,
            rating                      INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comment                     TEXT,
            additional_feedback         TEXT NOT NULL DEFAULT '[]',
            admin_response              TEXT,
            is_response_seen_by_student INTEGER NOT NULL DEFAULT 0,
            created_at                  TEXT NOT NULL,
            UNIQUE (student_id, class_id)
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
        CREATE INDEX IF NOT EXISTS idx_feedback_student ON feedback(student_id, batch_id, semester_number);
        "#,
    },
    Migration {
        version: "20250615_0002_feedback_questions",
        description: "Created feedback_questions",
        sql: r#"
        CREATE TABLE IF NOT EXISTS feedback_questions (
            id              TEXT PRIMARY KEY,
            question_text   TEXT NOT NULL,
            question_type   TEXT NOT NULL CHECK (question_type IN ('text','multiple_choice')),
            options         TEXT,
            batch_id        TEXT REFERENCES batches(id) ON DELETE CASCADE,
            semester_number INTEGER CHECK (semester_number BETWEEN 1 AND 8),
            created_at      TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250702_0003_schedule_indexes",
        description: "Added timetable and feedback date indexes",
        sql: r#"
        CREATE INDEX IF NOT EXISTS idx_timetables_day
            ON timetables(batch_id, semester_number, day_of_week, start_time);
        CREATE INDEX IF NOT EXISTS idx_feedback_created ON feedback(created_at);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![Local::now().to_rfc3339(), m.version, m.description],
    )?;

    tx.commit()?;
    tracing::info!(version = m.version, "migration applied");
    Ok(())
}

/// Versions not yet recorded in the `log` table, in application order.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    let pending = pending_migrations(conn)?;
    if pending.is_empty() {
        return Ok(0);
    }

    // Upgrading a database that already holds data → safety copy first.
    let upgrading = pending.len() < MIGRATIONS.len();
    if upgrading {
        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if db_path.is_empty() {
            warning("Could not determine DB path — backup skipped.");
        } else {
            crate::core::backup::snapshot_before_migration(&db_path)?;
        }
    }

    for m in MIGRATIONS.iter().filter(|m| pending.contains(&m.version)) {
        apply(conn, m)?;
    }

    Ok(pending.len())
}
