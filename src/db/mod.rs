pub mod batches;
pub mod feedback;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod questions;
pub mod sessions;
pub mod stats;
pub mod subjects;
pub mod timetables;
pub mod users;

use crate::errors::AppError;
use crate::utils::date;
use crate::utils::time::format_timestamp;
use rusqlite::ffi;

/// Fresh primary key for every portal table.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// `created_at` / `updated_at` value for the current wall-clock time.
pub fn timestamp_now() -> String {
    format_timestamp(date::now())
}

/// True when the statement failed on a UNIQUE / PRIMARY KEY constraint.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}

/// Map a unique violation to a caller-facing conflict, anything else to `Db`.
pub(crate) fn conflict_on_unique(err: rusqlite::Error, msg: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(msg.to_string())
    } else {
        AppError::Db(err)
    }
}

/// Turn a column decoding failure into a rusqlite error, as `query_map` expects.
pub(crate) fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}
