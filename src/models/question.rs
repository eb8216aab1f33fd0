use serde::{Deserialize, Serialize};

/// Shape of the answer a feedback question expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "question_type", rename_all = "snake_case")]
pub enum QuestionKind {
    #[serde(rename = "text")]
    FreeText,
    MultipleChoice { options: Vec<String> },
}

impl QuestionKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            QuestionKind::FreeText => "text",
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
        }
    }

    /// Rebuild from the `question_type` / `options` columns.
    pub fn from_db(kind: &str, options: Option<Vec<String>>) -> Option<Self> {
        match kind {
            "text" => Some(QuestionKind::FreeText),
            "multiple_choice" => Some(QuestionKind::MultipleChoice {
                options: options.unwrap_or_default(),
            }),
            _ => None,
        }
    }

    pub fn options(&self) -> Option<&[String]> {
        match self {
            QuestionKind::FreeText => None,
            QuestionKind::MultipleChoice { options } => Some(options),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackQuestion {
    pub id: String,
    pub question_text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub batch_id: Option<String>,
    pub semester_number: Option<i64>,
    pub created_at: String,
    pub batch_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionInput {
    pub question_text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub batch_id: String,
    pub semester_number: i64,
}
