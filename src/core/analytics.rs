use crate::db;
use crate::errors::AppResult;
use crate::utils::date::days_back;
use crate::utils::time::format_timestamp;
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use serde::Serialize;

pub const DEFAULT_TREND_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub student_count: i64,
    pub subject_count: i64,
    pub total_feedback_count: i64,
    pub feedback_today_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectStat {
    pub class_id: String,
    pub subject_name: String,
    pub feedback_count: i64,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectAnalytics {
    pub class_id: String,
    pub subject_name: String,
    pub period: Option<i64>,
    pub batch_name: Option<String>,
    pub semester_number: Option<i64>,
    pub feedback_count: i64,
    pub average_rating: Option<f64>,
    pub min_rating: Option<i64>,
    pub max_rating: Option<i64>,
    /// Index 0 holds the number of 1-star ratings, index 4 the 5-star ones.
    pub rating_counts: [i64; 5],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub feedback_count: i64,
    pub average_rating: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn dashboard_stats(conn: &Connection, now: NaiveDateTime) -> AppResult<DashboardStats> {
    Ok(DashboardStats {
        student_count: db::users::count_students(conn)?,
        subject_count: db::subjects::count_subjects(conn)?,
        total_feedback_count: db::feedback::count_all(conn)?,
        feedback_today_count: db::feedback::count_since(conn, &format_timestamp(days_back(now, 0)))?,
    })
}

/// Count and mean rating of every subject that has received feedback.
pub fn subject_stats(conn: &Connection) -> AppResult<Vec<SubjectStat>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, COUNT(f.id), AVG(f.rating)
         FROM subjects s
         JOIN feedback f ON f.class_id = s.id
         GROUP BY s.id, s.name
         ORDER BY s.name ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(SubjectStat {
            class_id: row.get(0)?,
            subject_name: row.get(1)?,
            feedback_count: row.get(2)?,
            average_rating: round2(row.get(3)?),
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Per-subject breakdown, including subjects nobody has rated yet.
pub fn subject_analytics(
    conn: &Connection,
    batch_id: Option<&str>,
    semester_number: Option<i64>,
) -> AppResult<Vec<SubjectAnalytics>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, s.period, b.name, s.semester_number,
                COUNT(f.id), AVG(f.rating), MIN(f.rating), MAX(f.rating),
                SUM(f.rating = 1), SUM(f.rating = 2), SUM(f.rating = 3),
                SUM(f.rating = 4), SUM(f.rating = 5)
         FROM subjects s
         LEFT JOIN batches b ON b.id = s.batch_id
         LEFT JOIN feedback f ON f.class_id = s.id
         WHERE (?1 IS NULL OR s.batch_id = ?1)
           AND (?2 IS NULL OR s.semester_number = ?2)
         GROUP BY s.id
         ORDER BY s.semester_number, s.name, s.period",
    )?;

    let rows = stmt.query_map(params![batch_id, semester_number], |row| {
        let mut rating_counts = [0_i64; 5];
        for (i, slot) in rating_counts.iter_mut().enumerate() {
            *slot = row.get::<_, Option<i64>>(9 + i)?.unwrap_or(0);
        }
        Ok(SubjectAnalytics {
            class_id: row.get(0)?,
            subject_name: row.get(1)?,
            period: row.get(2)?,
            batch_name: row.get(3)?,
            semester_number: row.get(4)?,
            feedback_count: row.get(5)?,
            average_rating: row.get::<_, Option<f64>>(6)?.map(round2),
            min_rating: row.get(7)?,
            max_rating: row.get(8)?,
            rating_counts,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Daily count and mean rating over the last `timeframe_days` days (today included).
/// Days without feedback are omitted.
pub fn daily_trends(
    conn: &Connection,
    now: NaiveDateTime,
    timeframe_days: u32,
    batch_id: Option<&str>,
    semester_number: Option<i64>,
) -> AppResult<Vec<TrendPoint>> {
    let since = format_timestamp(days_back(now, timeframe_days.saturating_sub(1)));

    let mut stmt = conn.prepare(
        "SELECT substr(created_at, 1, 10) AS day, COUNT(*), AVG(rating)
         FROM feedback
         WHERE created_at >= ?1
           AND (?2 IS NULL OR batch_id = ?2)
           AND (?3 IS NULL OR semester_number = ?3)
         GROUP BY day
         ORDER BY day ASC",
    )?;
    let rows = stmt.query_map(params![since, batch_id, semester_number], |row| {
        Ok(TrendPoint {
            date: row.get(0)?,
            feedback_count: row.get(1)?,
            average_rating: round2(row.get(2)?),
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
