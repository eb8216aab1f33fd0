use serde::{Deserialize, Serialize};

/// A cohort of students admitted together (e.g. "2024-2028").
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Batch {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchInput {
    pub name: String,
}
