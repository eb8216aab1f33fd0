use crate::errors::AppResult;
use crate::utils::time::format_timestamp;
use chrono::{Duration, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, params};

/// Create a bearer token valid for `ttl_hours` from `now`.
pub fn create_session(
    conn: &Connection,
    user_id: &str,
    now: NaiveDateTime,
    ttl_hours: u32,
) -> AppResult<String> {
    let token = uuid::Uuid::new_v4().simple().to_string();
    let expires = now + Duration::hours(i64::from(ttl_hours));

    conn.execute(
        "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
        params![token, user_id, format_timestamp(now), format_timestamp(expires)],
    )?;
    Ok(token)
}

/// User id behind a token that has not expired at `now`.
pub fn find_session_user(
    conn: &Connection,
    token: &str,
    now: NaiveDateTime,
) -> AppResult<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT user_id FROM sessions WHERE token = ?1 AND expires_at > ?2",
            params![token, format_timestamp(now)],
            |row| row.get(0),
        )
        .optional()?)
}

pub fn delete_session(conn: &Connection, token: &str) -> AppResult<()> {
    conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
    Ok(())
}

/// Drop expired tokens; returns how many were removed.
pub fn purge_expired(conn: &Connection, now: NaiveDateTime) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        [format_timestamp(now)],
    )?)
}
