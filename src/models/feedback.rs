use serde::{Deserialize, Serialize};

/// A free-text answer, a single choice, or a set of choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    One(String),
    Many(Vec<String>),
}

/// Answer snapshot stored with the feedback (question text included so later
/// edits to the question do not rewrite history).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question_id: String,
    pub question_text: String,
    pub answer: Answer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: String,
    pub answer: Answer,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub student_id: String,
    pub class_id: String,
    pub batch_id: Option<String>,
    pub semester_number: Option<i64>,
    pub rating: i64,
    pub comment: Option<String>,
    pub additional_feedback: Vec<AnsweredQuestion>,
    pub admin_response: Option<String>,
    pub is_response_seen_by_student: bool,
    pub created_at: String,
    pub subject_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub batch_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponseInput {
    #[serde(default)]
    pub admin_response: Option<String>,
    #[serde(default)]
    pub is_response_seen_by_student: Option<bool>,
}
