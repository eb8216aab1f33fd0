use crate::db::{conversion_error, new_id, timestamp_now};
use crate::errors::{AppError, AppResult};
use crate::models::question::QuestionInput;
use crate::models::{FeedbackQuestion, QuestionKind};
use rusqlite::{Connection, OptionalExtension, Row, params};

const QUESTION_SELECT: &str = "
    SELECT q.id, q.question_text, q.question_type, q.options, q.batch_id,
           q.semester_number, q.created_at, b.name AS batch_name
    FROM feedback_questions q
    LEFT JOIN batches b ON b.id = q.batch_id";

fn map_question(row: &Row) -> rusqlite::Result<FeedbackQuestion> {
    let kind_str: String = row.get("question_type")?;
    let options: Option<String> = row.get("options")?;
    let options = options
        .map(|o| serde_json::from_str::<Vec<String>>(&o))
        .transpose()
        .map_err(|e| conversion_error(3, AppError::Json(e)))?;

    let kind = QuestionKind::from_db(&kind_str, options).ok_or_else(|| {
        conversion_error(
            2,
            AppError::Validation(format!("Invalid question type: {kind_str}")),
        )
    })?;

    Ok(FeedbackQuestion {
        id: row.get("id")?,
        question_text: row.get("question_text")?,
        kind,
        batch_id: row.get("batch_id")?,
        semester_number: row.get("semester_number")?,
        created_at: row.get("created_at")?,
        batch_name: row.get("batch_name")?,
    })
}

fn options_json(kind: &QuestionKind) -> AppResult<Option<String>> {
    Ok(match kind.options() {
        Some(opts) => Some(serde_json::to_string(opts)?),
        None => None,
    })
}

pub fn list_questions(
    conn: &Connection,
    batch_id: Option<&str>,
    semester_number: Option<i64>,
) -> AppResult<Vec<FeedbackQuestion>> {
    let sql = format!(
        "{QUESTION_SELECT}
         WHERE (?1 IS NULL OR q.batch_id = ?1)
           AND (?2 IS NULL OR q.semester_number = ?2)
         ORDER BY q.created_at ASC, q.rowid ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![batch_id, semester_number], map_question)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_question(conn: &Connection, id: &str) -> AppResult<Option<FeedbackQuestion>> {
    let sql = format!("{QUESTION_SELECT} WHERE q.id = ?1");
    Ok(conn.query_row(&sql, [id], map_question).optional()?)
}

/// Stores an already validated question.
pub fn insert_question(conn: &Connection, input: &QuestionInput) -> AppResult<FeedbackQuestion> {
    let id = new_id();
    conn.execute(
        "INSERT INTO feedback_questions
            (id, question_text, question_type, options, batch_id, semester_number, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            input.question_text.trim(),
            input.kind.to_db_str(),
            options_json(&input.kind)?,
            input.batch_id,
            input.semester_number,
            timestamp_now()
        ],
    )?;
    get_question(conn, &id)?.ok_or_else(|| AppError::NotFound("Question".into()))
}

pub fn update_question(
    conn: &Connection,
    id: &str,
    input: &QuestionInput,
) -> AppResult<FeedbackQuestion> {
    let changed = conn.execute(
        "UPDATE feedback_questions
         SET question_text = ?1, question_type = ?2, options = ?3, batch_id = ?4,
             semester_number = ?5
         WHERE id = ?6",
        params![
            input.question_text.trim(),
            input.kind.to_db_str(),
            options_json(&input.kind)?,
            input.batch_id,
            input.semester_number,
            id
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound("Question".into()));
    }
    get_question(conn, id)?.ok_or_else(|| AppError::NotFound("Question".into()))
}

pub fn delete_question(conn: &Connection, id: &str) -> AppResult<()> {
    if conn.execute("DELETE FROM feedback_questions WHERE id = ?1", [id])? == 0 {
        return Err(AppError::NotFound("Question".into()));
    }
    Ok(())
}
