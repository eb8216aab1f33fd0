use crate::core::window::FeedbackWindow;
use crate::db::feedback::submitted_class_ids;
use crate::db::timetables::sessions_for_day;
use crate::errors::AppResult;
use crate::models::ScheduledSession;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

/// One of today's classes as seen by a particular student.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySubject {
    pub session: ScheduledSession,
    /// `None` when the session cannot produce a same-day window.
    pub window: Option<FeedbackWindow>,
    pub already_submitted: bool,
}

impl DailySubject {
    pub fn class_id(&self) -> &str {
        &self.session.class_id
    }

    pub fn subject_name(&self) -> &str {
        self.session.subject_name.as_deref().unwrap_or("?")
    }
}

/// The student's sessions for `date`, earliest first, each flagged with
/// whether feedback for that subject already exists.
///
/// Two sessions of the same subject stay two entries.
pub fn resolve_todays_subjects(
    conn: &Connection,
    date: NaiveDate,
    batch_id: &str,
    semester_number: i64,
    student_id: &str,
    grace_minutes: u32,
) -> AppResult<Vec<DailySubject>> {
    let day = crate::utils::date::day_of_week(date);
    let sessions = sessions_for_day(conn, day, batch_id, semester_number)?;
    let submitted = submitted_class_ids(conn, student_id, batch_id, semester_number)?;

    Ok(sessions
        .into_iter()
        .map(|session| DailySubject {
            window: FeedbackWindow::for_session(
                date,
                session.start_time,
                session.end_time,
                grace_minutes,
            ),
            already_submitted: submitted.contains(&session.class_id),
            session,
        })
        .collect())
}

/// One entry per weekday, Monday (1) to Sunday (7), each day by start time.
pub fn weekly_timetable(
    conn: &Connection,
    batch_id: &str,
    semester_number: i64,
) -> AppResult<Vec<(u8, Vec<ScheduledSession>)>> {
    let mut week = Vec::with_capacity(7);
    for day in 1..=7u8 {
        week.push((day, sessions_for_day(conn, day, batch_id, semester_number)?));
    }
    Ok(week)
}
