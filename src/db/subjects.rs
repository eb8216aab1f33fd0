use crate::db::{new_id, timestamp_now};
use crate::errors::{AppError, AppResult};
use crate::models::Subject;
use crate::models::subject::SubjectInput;
use rusqlite::{Connection, OptionalExtension, Row, params};

const SUBJECT_SELECT: &str = "
    SELECT s.id, s.name, s.period, s.batch_id, s.semester_number, s.created_at,
           b.name AS batch_name
    FROM subjects s
    LEFT JOIN batches b ON b.id = s.batch_id";

fn map_subject(row: &Row) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get("id")?,
        name: row.get("name")?,
        period: row.get("period")?,
        batch_id: row.get("batch_id")?,
        semester_number: row.get("semester_number")?,
        created_at: row.get("created_at")?,
        batch_name: row.get("batch_name")?,
    })
}

/// Subjects, optionally restricted to one batch and/or semester.
pub fn list_subjects(
    conn: &Connection,
    batch_id: Option<&str>,
    semester_number: Option<i64>,
) -> AppResult<Vec<Subject>> {
    let sql = format!(
        "{SUBJECT_SELECT}
         WHERE (?1 IS NULL OR s.batch_id = ?1)
           AND (?2 IS NULL OR s.semester_number = ?2)
         ORDER BY s.semester_number, s.name, s.period"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![batch_id, semester_number], map_subject)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_subject(conn: &Connection, id: &str) -> AppResult<Option<Subject>> {
    let sql = format!("{SUBJECT_SELECT} WHERE s.id = ?1");
    Ok(conn.query_row(&sql, [id], map_subject).optional()?)
}

fn validate(input: &SubjectInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::validation("Subject name is required"));
    }
    if input.batch_id.trim().is_empty() {
        return Err(AppError::validation("Batch is required"));
    }
    if !(1..=8).contains(&input.semester_number) {
        return Err(AppError::validation("Semester must be between 1 and 8"));
    }
    if matches!(input.period, Some(p) if p < 1) {
        return Err(AppError::validation("Period must be a positive number"));
    }
    Ok(())
}

fn ensure_batch(conn: &Connection, batch_id: &str) -> AppResult<()> {
    if crate::db::batches::get_batch(conn, batch_id)?.is_none() {
        return Err(AppError::NotFound("Batch".into()));
    }
    Ok(())
}

pub fn insert_subject(conn: &Connection, input: &SubjectInput) -> AppResult<Subject> {
    validate(input)?;
    ensure_batch(conn, &input.batch_id)?;

    let id = new_id();
    conn.execute(
        "INSERT INTO subjects (id, name, period, batch_id, semester_number, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            input.name.trim(),
            input.period,
            input.batch_id,
            input.semester_number,
            timestamp_now()
        ],
    )?;

    get_subject(conn, &id)?.ok_or_else(|| AppError::NotFound("Subject".into()))
}

pub fn update_subject(conn: &Connection, id: &str, input: &SubjectInput) -> AppResult<Subject> {
    validate(input)?;
    ensure_batch(conn, &input.batch_id)?;

    let changed = conn.execute(
        "UPDATE subjects SET name = ?1, period = ?2, batch_id = ?3, semester_number = ?4
         WHERE id = ?5",
        params![
            input.name.trim(),
            input.period,
            input.batch_id,
            input.semester_number,
            id
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound("Subject".into()));
    }
    get_subject(conn, id)?.ok_or_else(|| AppError::NotFound("Subject".into()))
}

/// Timetable entries and feedback for the subject are removed with it.
pub fn delete_subject(conn: &Connection, id: &str) -> AppResult<()> {
    if conn.execute("DELETE FROM subjects WHERE id = ?1", [id])? == 0 {
        return Err(AppError::NotFound("Subject".into()));
    }
    Ok(())
}

pub fn count_subjects(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM subjects", [], |r| r.get(0))?)
}
