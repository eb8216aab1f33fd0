//! Bulk creation for the admin screens. Each row is created on its own: a bad
//! row lands in `failed` and never stops the rows after it.

use crate::db;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use serde::Serialize;

pub const MAX_BULK_ROWS: usize = 500;

#[derive(Debug, Clone, Serialize)]
pub struct BulkCreated {
    /// 1-based position in the request.
    pub row: usize,
    pub item: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkFailed {
    pub row: usize,
    pub item: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkReport {
    pub success: Vec<BulkCreated>,
    pub failed: Vec<BulkFailed>,
}

impl BulkReport {
    pub fn summary(&self) -> String {
        format!("{} created, {} failed", self.success.len(), self.failed.len())
    }
}

/// Reject an empty upload or one over `MAX_BULK_ROWS` before touching anything.
pub fn check_rows<T>(rows: &[T], what: &str) -> AppResult<()> {
    if rows.is_empty() {
        return Err(AppError::Validation(format!("No {what} provided")));
    }
    if rows.len() > MAX_BULK_ROWS {
        return Err(AppError::Validation(format!(
            "At most {MAX_BULK_ROWS} {what} per upload"
        )));
    }
    Ok(())
}

/// Run `create` for every row and sort the outcomes into the report.
/// `label` names the row in the report, `id` extracts the created id.
pub fn create_each<R, T>(
    rows: Vec<R>,
    label: impl Fn(&R) -> String,
    mut create: impl FnMut(R) -> AppResult<T>,
    id: impl Fn(&T) -> String,
) -> BulkReport {
    let mut report = BulkReport::default();

    for (i, row) in rows.into_iter().enumerate() {
        let item = label(&row);
        match create(row) {
            Ok(created) => report.success.push(BulkCreated {
                row: i + 1,
                item,
                id: id(&created),
            }),
            Err(e) => {
                let error = if e.is_client_error() {
                    e.to_string()
                } else {
                    tracing::warn!(row = i + 1, %item, error = %e, "bulk row failed");
                    "Internal error".to_string()
                };
                report.failed.push(BulkFailed {
                    row: i + 1,
                    item,
                    error,
                });
            }
        }
    }
    report
}

/// One audit line per upload.
pub fn audit(conn: &Connection, target: &str, report: &BulkReport) {
    db::log::ttlog_quiet(conn, "create", target, &report.summary());
}
