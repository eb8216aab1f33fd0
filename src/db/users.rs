use crate::db::{conflict_on_unique, new_id, timestamp_now};
use crate::errors::{AppError, AppResult};
use crate::models::Profile;
use rusqlite::{Connection, OptionalExtension, Row, params};

const PROFILE_SELECT: &str = "
    SELECT p.id, p.email, p.first_name, p.last_name, p.avatar_url, p.is_admin,
           p.batch_id, p.semester_number, p.updated_at, b.name AS batch_name
    FROM profiles p
    LEFT JOIN batches b ON b.id = p.batch_id";

/// Everything needed to create a user and its profile in one go.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: bool,
    pub batch_id: Option<String>,
    pub semester_number: Option<i64>,
}

pub fn map_profile(row: &Row) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get("id")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        avatar_url: row.get("avatar_url")?,
        is_admin: row.get::<_, i64>("is_admin")? == 1,
        batch_id: row.get("batch_id")?,
        semester_number: row.get("semester_number")?,
        updated_at: row.get("updated_at")?,
        batch_name: row.get("batch_name")?,
    })
}

/// Insert `users` + `profiles` rows atomically. Returns the new user id.
pub fn insert_user(conn: &Connection, user: &NewUser) -> AppResult<String> {
    let id = new_id();
    let now = timestamp_now();
    let email = user.email.trim().to_lowercase();

    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO users (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, email, user.password_hash, now],
    )
    .map_err(|e| conflict_on_unique(e, "A user with this email already exists"))?;

    tx.execute(
        "INSERT INTO profiles
            (id, email, first_name, last_name, is_admin, batch_id, semester_number, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            email,
            user.first_name,
            user.last_name,
            user.is_admin as i64,
            user.batch_id,
            user.semester_number,
            now
        ],
    )?;

    tx.commit()?;
    Ok(id)
}

/// `(user_id, password_hash)` for a login attempt.
pub fn find_credentials(conn: &Connection, email: &str) -> AppResult<Option<(String, String)>> {
    let email = email.trim().to_lowercase();
    Ok(conn
        .query_row(
            "SELECT id, password_hash FROM users WHERE email = ?1",
            [email],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?)
}

pub fn load_profile(conn: &Connection, user_id: &str) -> AppResult<Option<Profile>> {
    let sql = format!("{PROFILE_SELECT} WHERE p.id = ?1");
    Ok(conn.query_row(&sql, [user_id], map_profile).optional()?)
}

pub fn find_profile_by_email(conn: &Connection, email: &str) -> AppResult<Option<Profile>> {
    let sql = format!("{PROFILE_SELECT} WHERE p.email = ?1");
    let email = email.trim().to_lowercase();
    Ok(conn.query_row(&sql, [email], map_profile).optional()?)
}

/// All profiles, admins first, then by name.
pub fn list_profiles(conn: &Connection) -> AppResult<Vec<Profile>> {
    let sql = format!("{PROFILE_SELECT} ORDER BY p.is_admin DESC, p.last_name, p.first_name");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_profile)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_students(conn: &Connection) -> AppResult<Vec<Profile>> {
    let sql = format!("{PROFILE_SELECT} WHERE p.is_admin = 0 ORDER BY p.last_name, p.first_name");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_profile)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_student(
    conn: &Connection,
    id: &str,
    first_name: &str,
    last_name: &str,
    batch_id: &str,
    semester_number: i64,
) -> AppResult<Profile> {
    let changed = conn.execute(
        "UPDATE profiles
         SET first_name = ?1, last_name = ?2, batch_id = ?3, semester_number = ?4, updated_at = ?5
         WHERE id = ?6 AND is_admin = 0",
        params![first_name, last_name, batch_id, semester_number, timestamp_now(), id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound("Student".into()));
    }
    load_profile(conn, id)?.ok_or_else(|| AppError::NotFound("Student".into()))
}

/// Deleting the user cascades to profile, sessions and feedback.
pub fn delete_student(conn: &Connection, id: &str) -> AppResult<()> {
    let changed = conn.execute(
        "DELETE FROM users
         WHERE id = ?1 AND id IN (SELECT id FROM profiles WHERE is_admin = 0)",
        [id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound("Student".into()));
    }
    Ok(())
}

pub fn count_students(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM profiles WHERE is_admin = 0", [], |r| r.get(0))?)
}
