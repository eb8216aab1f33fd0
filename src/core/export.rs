use crate::db;
use crate::errors::{AppError, AppResult};
use crate::models::{Answer, FeedbackRecord};
use crate::ui::messages::{success, warning};
use rusqlite::Connection;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Flat feedback row, one per record, for CSV / JSON.
#[derive(Serialize, Clone, Debug)]
pub struct FeedbackExport {
    pub id: String,
    pub created_at: String,
    pub batch: String,
    pub semester: String,
    pub subject: String,
    pub student: String,
    pub rating: i64,
    pub comment: String,
    /// `question: answer` pairs joined with ` | `.
    pub answers: String,
    pub admin_response: String,
}

impl From<&FeedbackRecord> for FeedbackExport {
    fn from(r: &FeedbackRecord) -> Self {
        let student = [r.first_name.as_deref(), r.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        let answers = r
            .additional_feedback
            .iter()
            .map(|a| {
                let value = match &a.answer {
                    Answer::One(v) => v.clone(),
                    Answer::Many(vs) => vs.join(", "),
                };
                format!("{}: {}", a.question_text, value)
            })
            .collect::<Vec<_>>()
            .join(" | ");

        Self {
            id: r.id.clone(),
            created_at: r.created_at.clone(),
            batch: r.batch_name.clone().unwrap_or_default(),
            semester: r.semester_number.map(|s| s.to_string()).unwrap_or_default(),
            subject: r.subject_name.clone().unwrap_or_default(),
            student,
            rating: r.rating,
            comment: r.comment.clone().unwrap_or_default(),
            answers,
            admin_response: r.admin_response.clone().unwrap_or_default(),
        }
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export feedback.
    ///
    /// - `format`: "csv" | "json"
    /// - `file`: absolute path of the output file
    /// - `batch` / `semester`: optional filters (batch by name)
    ///
    /// Returns the number of exported rows.
    pub fn export(
        conn: &Connection,
        format: &str,
        file: &str,
        batch: Option<&str>,
        semester: Option<i64>,
        force: bool,
    ) -> AppResult<usize> {
        let fmt = format.to_lowercase();
        if !["csv", "json"].contains(&fmt.as_str()) {
            return Err(AppError::Export(format!(
                "Unsupported format '{format}'. Use one of: csv, json"
            )));
        }

        let path = Path::new(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let rows: Vec<FeedbackExport> = db::feedback::list_filtered(conn, batch, semester)?
            .iter()
            .map(FeedbackExport::from)
            .collect();

        if rows.is_empty() {
            warning("No feedback found for the selected filters. Nothing to export.");
            return Ok(0);
        }

        match fmt.as_str() {
            "csv" => export_csv(&rows, path)?,
            _ => export_json(&rows, path)?,
        }

        db::log::ttlog_quiet(
            conn,
            "export",
            file,
            &format!("Exported {} feedback rows as {}", rows.len(), fmt),
        );
        Ok(rows.len())
    }
}

/// Ask before overwriting an existing file, unless `force`.
fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    eprint!(
        "⚠️  File '{}' already exists. Overwrite? [y/N]: ",
        path.display()
    );
    io::stderr().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let ans = answer.trim().to_ascii_lowercase();

    if ans == "y" || ans == "yes" {
        Ok(())
    } else {
        Err(AppError::Export(
            "Export cancelled: existing file not overwritten".into(),
        ))
    }
}

fn export_json(rows: &[FeedbackExport], path: &Path) -> AppResult<()> {
    let json_data = serde_json::to_string_pretty(rows)?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    success(format!("Exported data to {}", path.display()));
    Ok(())
}

fn export_csv(rows: &[FeedbackExport], path: &Path) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    for item in rows {
        wtr.serialize(item)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;

    success(format!("Exported data to {}", path.display()));
    Ok(())
}
