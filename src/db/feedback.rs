use crate::db::{conversion_error, is_unique_violation, new_id};
use crate::errors::{AppError, AppResult};
use crate::models::{AnsweredQuestion, FeedbackRecord};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashSet;

const FEEDBACK_SELECT: &str = "
    SELECT f.id, f.student_id, f.class_id, f.batch_id, f.semester_number, f.rating,
           f.comment, f.additional_feedback, f.admin_response,
           f.is_response_seen_by_student, f.created_at,
           s.name AS subject_name, p.first_name, p.last_name, b.name AS batch_name
    FROM feedback f
    LEFT JOIN subjects s ON s.id = f.class_id
    LEFT JOIN profiles p ON p.id = f.student_id
    LEFT JOIN batches b ON b.id = f.batch_id";

/// A validated submission ready to be stored.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub student_id: String,
    pub class_id: String,
    pub batch_id: String,
    pub semester_number: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub additional_feedback: Vec<AnsweredQuestion>,
    pub created_at: String,
}

pub fn map_feedback(row: &Row) -> rusqlite::Result<FeedbackRecord> {
    let raw: String = row.get("additional_feedback")?;
    let additional_feedback: Vec<AnsweredQuestion> =
        serde_json::from_str(&raw).map_err(|e| conversion_error(7, AppError::Json(e)))?;

    Ok(FeedbackRecord {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        class_id: row.get("class_id")?,
        batch_id: row.get("batch_id")?,
        semester_number: row.get("semester_number")?,
        rating: row.get("rating")?,
        comment: row.get("comment")?,
        additional_feedback,
        admin_response: row.get("admin_response")?,
        is_response_seen_by_student: row.get::<_, i64>("is_response_seen_by_student")? == 1,
        created_at: row.get("created_at")?,
        subject_name: row.get("subject_name")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        batch_name: row.get("batch_name")?,
    })
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> AppResult<Vec<FeedbackRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map_feedback)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert a submission. A UNIQUE(student_id, class_id) hit becomes
/// [`AppError::DuplicateSubmission`].
pub fn insert_feedback(conn: &Connection, fb: &NewFeedback) -> AppResult<FeedbackRecord> {
    let id = new_id();
    let answers = serde_json::to_string(&fb.additional_feedback)?;

    conn.execute(
        "INSERT INTO feedback
            (id, student_id, class_id, batch_id, semester_number, rating, comment,
             additional_feedback, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            fb.student_id,
            fb.class_id,
            fb.batch_id,
            fb.semester_number,
            fb.rating,
            fb.comment,
            answers,
            fb.created_at
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::DuplicateSubmission
        } else {
            AppError::Db(e)
        }
    })?;

    get_feedback(conn, &id)?.ok_or_else(|| AppError::NotFound("Feedback".into()))
}

pub fn get_feedback(conn: &Connection, id: &str) -> AppResult<Option<FeedbackRecord>> {
    let sql = format!("{FEEDBACK_SELECT} WHERE f.id = ?1");
    Ok(conn.query_row(&sql, [id], map_feedback).optional()?)
}

pub fn exists_for(conn: &Connection, student_id: &str, class_id: &str) -> AppResult<bool> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM feedback WHERE student_id = ?1 AND class_id = ?2 LIMIT 1",
            [student_id, class_id],
            |_| Ok(()),
        )
        .optional()?
        .is_some())
}

/// Subject ids the student already rated in this batch/semester.
pub fn submitted_class_ids(
    conn: &Connection,
    student_id: &str,
    batch_id: &str,
    semester_number: i64,
) -> AppResult<HashSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT class_id FROM feedback
         WHERE student_id = ?1 AND batch_id = ?2 AND semester_number = ?3",
    )?;
    let rows = stmt.query_map(params![student_id, batch_id, semester_number], |row| {
        row.get::<_, String>(0)
    })?;

    let mut out = HashSet::new();
    for r in rows {
        out.insert(r?);
    }
    Ok(out)
}

pub fn list_all(conn: &Connection) -> AppResult<Vec<FeedbackRecord>> {
    let sql = format!("{FEEDBACK_SELECT} ORDER BY f.created_at DESC");
    collect(conn, &sql, params![])
}

pub fn list_for_student(conn: &Connection, student_id: &str) -> AppResult<Vec<FeedbackRecord>> {
    let sql = format!("{FEEDBACK_SELECT} WHERE f.student_id = ?1 ORDER BY f.created_at DESC");
    collect(conn, &sql, [student_id])
}

/// Feedback filtered by batch name and/or semester, oldest first (export order).
pub fn list_filtered(
    conn: &Connection,
    batch_name: Option<&str>,
    semester_number: Option<i64>,
) -> AppResult<Vec<FeedbackRecord>> {
    let sql = format!(
        "{FEEDBACK_SELECT}
         WHERE (?1 IS NULL OR b.name = ?1)
           AND (?2 IS NULL OR f.semester_number = ?2)
         ORDER BY f.created_at ASC"
    );
    collect(conn, &sql, params![batch_name, semester_number])
}

/// One page of a student's history plus the total row count.
pub fn history_page(
    conn: &Connection,
    student_id: &str,
    page: u32,
    page_size: u32,
) -> AppResult<(Vec<FeedbackRecord>, i64)> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM feedback WHERE student_id = ?1",
        [student_id],
        |r| r.get(0),
    )?;

    let offset = i64::from(page.saturating_sub(1)) * i64::from(page_size);
    let sql = format!(
        "{FEEDBACK_SELECT} WHERE f.student_id = ?1
         ORDER BY f.created_at DESC LIMIT ?2 OFFSET ?3"
    );
    let items = collect(conn, &sql, params![student_id, page_size, offset])?;
    Ok((items, total))
}

pub fn recent(conn: &Connection, limit: u32) -> AppResult<Vec<FeedbackRecord>> {
    let sql = format!("{FEEDBACK_SELECT} ORDER BY f.created_at DESC LIMIT ?1");
    collect(conn, &sql, [limit])
}

/// The student's feedback carrying an admin response not yet seen.
pub fn unseen_responses(conn: &Connection, student_id: &str) -> AppResult<Vec<FeedbackRecord>> {
    let sql = format!(
        "{FEEDBACK_SELECT}
         WHERE f.student_id = ?1
           AND f.admin_response IS NOT NULL AND f.admin_response <> ''
           AND f.is_response_seen_by_student = 0
         ORDER BY f.created_at DESC"
    );
    collect(conn, &sql, [student_id])
}

/// Admin reply. A new response resets the seen flag unless told otherwise.
pub fn respond(
    conn: &Connection,
    id: &str,
    admin_response: Option<&str>,
    seen: Option<bool>,
) -> AppResult<FeedbackRecord> {
    let current = get_feedback(conn, id)?.ok_or_else(|| AppError::NotFound("Feedback".into()))?;

    let response = admin_response
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    let response_changed = admin_response.is_some() && response != current.admin_response;
    let seen = seen.unwrap_or(if response_changed {
        false
    } else {
        current.is_response_seen_by_student
    });
    let response = if admin_response.is_some() {
        response
    } else {
        current.admin_response
    };

    conn.execute(
        "UPDATE feedback SET admin_response = ?1, is_response_seen_by_student = ?2 WHERE id = ?3",
        params![response, seen as i64, id],
    )?;
    get_feedback(conn, id)?.ok_or_else(|| AppError::NotFound("Feedback".into()))
}

/// Only the owner can acknowledge a response.
pub fn mark_seen(conn: &Connection, id: &str, student_id: &str) -> AppResult<FeedbackRecord> {
    let record = get_feedback(conn, id)?.ok_or_else(|| AppError::NotFound("Feedback".into()))?;
    if record.student_id != student_id {
        return Err(AppError::Forbidden(
            "You can only update your own feedback".into(),
        ));
    }

    conn.execute(
        "UPDATE feedback SET is_response_seen_by_student = 1 WHERE id = ?1",
        [id],
    )?;
    get_feedback(conn, id)?.ok_or_else(|| AppError::NotFound("Feedback".into()))
}

pub fn count_all(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM feedback", [], |r| r.get(0))?)
}

/// Rows whose `created_at` is at or after `since` (same text format).
pub fn count_since(conn: &Connection, since: &str) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM feedback WHERE created_at >= ?1",
        [since],
        |r| r.get(0),
    )?)
}
