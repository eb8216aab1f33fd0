use crate::utils::time::hhmm;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One weekly class occurrence (`timetables` row).
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledSession {
    pub id: String,
    pub day_of_week: u8,    // ⇔ 1 = Monday … 7 = Sunday
    pub class_id: String,   // ⇔ subjects.id
    pub batch_id: Option<String>,
    pub semester_number: Option<i64>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub created_at: String,
    pub subject_name: Option<String>,
    pub subject_period: Option<i64>,
    pub batch_name: Option<String>,
}

/// Times stay strings here so that malformed values surface as validation
/// errors with a readable message instead of a JSON decoding failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableInput {
    pub day_of_week: u8,
    pub class_id: String,
    pub batch_id: String,
    pub semester_number: i64,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimetableFilter {
    pub batch_id: Option<String>,
    pub semester_number: Option<i64>,
    pub day_of_week: Option<u8>,
}
