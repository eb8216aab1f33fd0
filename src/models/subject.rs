use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Disambiguates a subject name that recurs in the same batch/semester.
    pub period: Option<i64>,
    pub batch_id: Option<String>,
    pub semester_number: Option<i64>,
    pub created_at: String,
    pub batch_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInput {
    pub name: String,
    #[serde(default)]
    pub period: Option<i64>,
    pub batch_id: String,
    pub semester_number: i64,
}
