use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub batch_id: Option<String>,
    pub semester_number: Option<i64>,
    pub updated_at: String,
    pub batch_name: Option<String>,
}

/// The part of a profile that decides which scheduled sessions apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentProfile {
    pub student_id: String,
    pub batch_id: String,
    pub semester_number: i64,
}

impl Profile {
    /// `None` for admins and for students not yet assigned to a batch/semester.
    pub fn student_profile(&self) -> Option<StudentProfile> {
        if self.is_admin {
            return None;
        }
        Some(StudentProfile {
            student_id: self.id.clone(),
            batch_id: self.batch_id.clone()?,
            semester_number: self.semester_number?,
        })
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) => format!("{f} {l}"),
            (Some(f), None) => f.clone(),
            (None, Some(l)) => l.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub batch_id: String,
    pub semester_number: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    pub first_name: String,
    pub last_name: String,
    pub batch_id: String,
    pub semester_number: i64,
}
