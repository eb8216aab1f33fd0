use crate::core::gate::pick_active;
use crate::core::schedule::resolve_todays_subjects;
use crate::db;
use crate::db::feedback::NewFeedback;
use crate::errors::{AppError, AppResult};
use crate::models::feedback::AnswerInput;
use crate::models::{FeedbackRecord, Profile};
use crate::utils::time::format_timestamp;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Deserialize;

pub const MAX_COMMENT_LEN: usize = 500;

/// Body of `POST /api/feedback`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub class_id: String,
    #[serde(default)]
    pub batch_id: Option<String>,
    #[serde(default)]
    pub semester_number: Option<i64>,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub additional_feedback: Vec<AnswerInput>,
}

/// Clock and policy a submission is checked against.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionPolicy {
    pub now: NaiveDateTime,
    pub grace_minutes: u32,
    pub enforce_window: bool,
}

fn checked_comment(comment: Option<&str>) -> AppResult<Option<String>> {
    let Some(c) = comment.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if c.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(Some(c.to_string()))
}

/// Validate and store one feedback record for `student`.
///
/// Nothing is written unless every check passes. A second submission for the
/// same subject, whether caught up front or by the UNIQUE constraint, fails
/// with [`AppError::DuplicateSubmission`].
pub fn submit_feedback(
    conn: &Connection,
    student: &Profile,
    sub: &FeedbackSubmission,
    policy: SubmissionPolicy,
) -> AppResult<FeedbackRecord> {
    if student.is_admin {
        return Err(AppError::Forbidden(
            "Only students can submit feedback".into(),
        ));
    }
    let sp = student.student_profile().ok_or_else(|| {
        AppError::validation("Your profile has no batch or semester assigned")
    })?;

    // 1. payload
    if !(1..=5).contains(&sub.rating) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }
    let comment = checked_comment(sub.comment.as_deref())?;

    // 2. subject and profile consistency
    let subject = db::subjects::get_subject(conn, &sub.class_id)?
        .ok_or_else(|| AppError::NotFound("Subject".into()))?;

    let body_matches = sub.batch_id.as_deref().is_none_or(|b| b == sp.batch_id)
        && sub.semester_number.is_none_or(|s| s == sp.semester_number);
    let subject_matches = subject.batch_id.as_deref() == Some(sp.batch_id.as_str())
        && subject.semester_number == Some(sp.semester_number);
    if !body_matches || !subject_matches {
        return Err(AppError::validation(
            "Batch and semester do not match your profile",
        ));
    }

    // 3. one record per (student, subject)
    if db::feedback::exists_for(conn, &sp.student_id, &subject.id)? {
        return Err(AppError::DuplicateSubmission);
    }

    // 4. class window
    if policy.enforce_window {
        let today = resolve_todays_subjects(
            conn,
            policy.now.date(),
            &sp.batch_id,
            sp.semester_number,
            &sp.student_id,
            policy.grace_minutes,
        )?;
        // only the class the gate reports as active accepts feedback
        let active = pick_active(&today, policy.now).map(|d| d.class_id());
        if active != Some(subject.id.as_str()) {
            return Err(AppError::WindowClosed(format!(
                "Feedback for {} is only accepted during its class",
                subject.name
            )));
        }
    }

    // 5. extra questions
    let questions =
        db::questions::list_questions(conn, Some(&sp.batch_id), Some(sp.semester_number))?;
    let answers = crate::core::questions::validate_answers(&questions, &sub.additional_feedback)?;

    let record = db::feedback::insert_feedback(
        conn,
        &NewFeedback {
            student_id: sp.student_id.clone(),
            class_id: subject.id.clone(),
            batch_id: sp.batch_id.clone(),
            semester_number: sp.semester_number,
            rating: sub.rating,
            comment,
            additional_feedback: answers,
            created_at: format_timestamp(policy.now),
        },
    )?;

    db::log::ttlog_quiet(
        conn,
        "feedback",
        &record.id,
        &format!("Rating {} for {} by {}", record.rating, subject.name, student.email),
    );
    tracing::info!(feedback = %record.id, subject = %subject.name, rating = record.rating, "feedback submitted");

    Ok(record)
}
