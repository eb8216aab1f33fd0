use crate::db::{conversion_error, new_id, timestamp_now};
use crate::errors::{AppError, AppResult};
use crate::models::ScheduledSession;
use crate::models::timetable::{TimetableFilter, TimetableInput};
use crate::utils::date::weekday_name;
use crate::utils::time::{format_hhmm, parse_hhmm, parse_time};
use chrono::NaiveTime;
use rusqlite::{Connection, OptionalExtension, Row, params};

// Inner join: a session whose subject is gone is never returned.
const SESSION_SELECT: &str = "
    SELECT t.id, t.day_of_week, t.class_id, t.batch_id, t.semester_number,
           t.start_time, t.end_time, t.created_at,
           s.name AS subject_name, s.period AS subject_period, b.name AS batch_name
    FROM timetables t
    JOIN subjects s ON s.id = t.class_id
    LEFT JOIN batches b ON b.id = t.batch_id";

fn stored_time(row: &Row, col: &str, idx: usize) -> rusqlite::Result<NaiveTime> {
    let raw: String = row.get(col)?;
    parse_time(&raw).ok_or_else(|| conversion_error(idx, AppError::InvalidTime(raw.clone())))
}

pub fn map_session(row: &Row) -> rusqlite::Result<ScheduledSession> {
    Ok(ScheduledSession {
        id: row.get("id")?,
        day_of_week: row.get("day_of_week")?,
        class_id: row.get("class_id")?,
        batch_id: row.get("batch_id")?,
        semester_number: row.get("semester_number")?,
        start_time: stored_time(row, "start_time", 5)?,
        end_time: stored_time(row, "end_time", 6)?,
        created_at: row.get("created_at")?,
        subject_name: row.get("subject_name")?,
        subject_period: row.get("subject_period")?,
        batch_name: row.get("batch_name")?,
    })
}

pub fn list_sessions(conn: &Connection, filter: &TimetableFilter) -> AppResult<Vec<ScheduledSession>> {
    let sql = format!(
        "{SESSION_SELECT}
         WHERE (?1 IS NULL OR t.batch_id = ?1)
           AND (?2 IS NULL OR t.semester_number = ?2)
           AND (?3 IS NULL OR t.day_of_week = ?3)
         ORDER BY t.day_of_week ASC, t.start_time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![filter.batch_id, filter.semester_number, filter.day_of_week],
        map_session,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Sessions of one batch/semester on one weekday, earliest first.
pub fn sessions_for_day(
    conn: &Connection,
    day_of_week: u8,
    batch_id: &str,
    semester_number: i64,
) -> AppResult<Vec<ScheduledSession>> {
    list_sessions(
        conn,
        &TimetableFilter {
            batch_id: Some(batch_id.to_string()),
            semester_number: Some(semester_number),
            day_of_week: Some(day_of_week),
        },
    )
}

pub fn get_session(conn: &Connection, id: &str) -> AppResult<Option<ScheduledSession>> {
    let sql = format!("{SESSION_SELECT} WHERE t.id = ?1");
    Ok(conn.query_row(&sql, [id], map_session).optional()?)
}

/// Checked form of a [`TimetableInput`].
struct SessionSlot<'a> {
    day_of_week: u8,
    class_id: &'a str,
    batch_id: &'a str,
    semester_number: i64,
    start: NaiveTime,
    end: NaiveTime,
}

fn validate<'a>(
    conn: &Connection,
    input: &'a TimetableInput,
    exclude_id: Option<&str>,
) -> AppResult<SessionSlot<'a>> {
    if !(1..=7).contains(&input.day_of_week) {
        return Err(AppError::validation("Day of week must be between 1 and 7"));
    }
    if !(1..=8).contains(&input.semester_number) {
        return Err(AppError::validation("Semester must be between 1 and 8"));
    }
    if input.class_id.trim().is_empty() || input.batch_id.trim().is_empty() {
        return Err(AppError::validation("Subject and batch are required"));
    }

    let start = parse_hhmm(&input.start_time)?;
    let end = parse_hhmm(&input.end_time)?;
    // also rules out sessions that cross midnight
    if start >= end {
        return Err(AppError::validation("Start time must be before end time"));
    }

    let subject = crate::db::subjects::get_subject(conn, &input.class_id)?
        .ok_or_else(|| AppError::NotFound("Subject".into()))?;
    if crate::db::batches::get_batch(conn, &input.batch_id)?.is_none() {
        return Err(AppError::NotFound("Batch".into()));
    }
    // students can only rate subjects of their own batch/semester
    if subject.batch_id.as_deref() != Some(input.batch_id.as_str())
        || subject.semester_number != Some(input.semester_number)
    {
        return Err(AppError::Validation(format!(
            "{} belongs to another batch or semester",
            subject.name
        )));
    }

    let slot = SessionSlot {
        day_of_week: input.day_of_week,
        class_id: &input.class_id,
        batch_id: &input.batch_id,
        semester_number: input.semester_number,
        start,
        end,
    };

    if let Some(other) = find_overlap(conn, &slot, exclude_id)? {
        return Err(AppError::Validation(format!(
            "Overlaps {} on {} ({}-{})",
            other.subject_name.as_deref().unwrap_or("another session"),
            weekday_name(other.day_of_week),
            format_hhmm(other.start_time),
            format_hhmm(other.end_time)
        )));
    }

    Ok(slot)
}

/// First session of the same batch/semester/day whose interval intersects.
fn find_overlap(
    conn: &Connection,
    slot: &SessionSlot,
    exclude_id: Option<&str>,
) -> AppResult<Option<ScheduledSession>> {
    let existing = sessions_for_day(conn, slot.day_of_week, slot.batch_id, slot.semester_number)?;
    Ok(existing.into_iter().find(|s| {
        Some(s.id.as_str()) != exclude_id && s.start_time < slot.end && slot.start < s.end_time
    }))
}

pub fn insert_session(conn: &Connection, input: &TimetableInput) -> AppResult<ScheduledSession> {
    let slot = validate(conn, input, None)?;
    let id = new_id();

    conn.execute(
        "INSERT INTO timetables
            (id, day_of_week, class_id, batch_id, semester_number, start_time, end_time, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            slot.day_of_week,
            slot.class_id,
            slot.batch_id,
            slot.semester_number,
            format_hhmm(slot.start),
            format_hhmm(slot.end),
            timestamp_now()
        ],
    )?;

    get_session(conn, &id)?.ok_or_else(|| AppError::NotFound("Timetable entry".into()))
}

pub fn update_session(
    conn: &Connection,
    id: &str,
    input: &TimetableInput,
) -> AppResult<ScheduledSession> {
    if get_session(conn, id)?.is_none() {
        return Err(AppError::NotFound("Timetable entry".into()));
    }
    let slot = validate(conn, input, Some(id))?;

    conn.execute(
        "UPDATE timetables
         SET day_of_week = ?1, class_id = ?2, batch_id = ?3, semester_number = ?4,
             start_time = ?5, end_time = ?6
         WHERE id = ?7",
        params![
            slot.day_of_week,
            slot.class_id,
            slot.batch_id,
            slot.semester_number,
            format_hhmm(slot.start),
            format_hhmm(slot.end),
            id
        ],
    )?;

    get_session(conn, id)?.ok_or_else(|| AppError::NotFound("Timetable entry".into()))
}

pub fn delete_session(conn: &Connection, id: &str) -> AppResult<()> {
    if conn.execute("DELETE FROM timetables WHERE id = ?1", [id])? == 0 {
        return Err(AppError::NotFound("Timetable entry".into()));
    }
    Ok(())
}
