use crate::db;
use crate::db::users::NewUser;
use crate::errors::{AppError, AppResult};
use crate::models::Profile;
use crate::models::profile::{RegisterInput, StudentInput, StudentUpdate};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::NaiveDateTime;
use rusqlite::Connection;

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// A malformed stored hash simply fails verification.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Email and password requirements, checked before any hashing happens.
pub fn check_credentials_shape(email: &str, password: &str) -> AppResult<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("A valid email is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn check_enrollment(conn: &Connection, batch_id: &str, semester_number: i64) -> AppResult<()> {
    if !(1..=8).contains(&semester_number) {
        return Err(AppError::validation("Semester must be between 1 and 8"));
    }
    if db::batches::get_batch(conn, batch_id)?.is_none() {
        return Err(AppError::NotFound("Batch".into()));
    }
    Ok(())
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Store an account whose `password_hash` is already set.
pub fn store_account(conn: &Connection, user: NewUser) -> AppResult<Profile> {
    if let (Some(batch), Some(sem)) = (&user.batch_id, user.semester_number) {
        check_enrollment(conn, batch, sem)?;
    }
    let id = db::users::insert_user(conn, &user)?;

    db::log::ttlog_quiet(
        conn,
        "user_created",
        &user.email,
        if user.is_admin {
            "Admin account created"
        } else {
            "Student account created"
        },
    );
    db::users::load_profile(conn, &id)?.ok_or_else(|| AppError::NotFound("Profile".into()))
}

/// Hash and store in one step, for callers without an async runtime (`user add`).
pub fn create_account(conn: &Connection, user: NewUser, password: &str) -> AppResult<Profile> {
    check_credentials_shape(&user.email, password)?;
    let user = NewUser {
        password_hash: hash_password(password)?,
        ..user
    };
    store_account(conn, user)
}

/// Self-service sign-up: always a non-admin account without enrollment.
pub fn registration(input: &RegisterInput) -> NewUser {
    NewUser {
        email: input.email.clone(),
        first_name: non_blank(input.first_name.as_deref()),
        last_name: non_blank(input.last_name.as_deref()),
        ..NewUser::default()
    }
}

/// Student account from the admin form, without its password hash.
pub fn student_account(input: &StudentInput) -> AppResult<NewUser> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(AppError::validation("First and last name are required"));
    }
    Ok(NewUser {
        email: input.email.clone(),
        first_name: non_blank(Some(&input.first_name)),
        last_name: non_blank(Some(&input.last_name)),
        is_admin: false,
        batch_id: Some(input.batch_id.clone()),
        semester_number: Some(input.semester_number),
        ..NewUser::default()
    })
}

/// Everything about a student row that needs no database, hash included.
pub fn prepare_student(input: &StudentInput) -> AppResult<NewUser> {
    let user = student_account(input)?;
    check_credentials_shape(&user.email, &input.password)?;
    Ok(NewUser {
        password_hash: hash_password(&input.password)?,
        ..user
    })
}

pub fn create_student(conn: &Connection, input: &StudentInput) -> AppResult<Profile> {
    store_account(conn, prepare_student(input)?)
}

pub fn update_student(conn: &Connection, id: &str, input: &StudentUpdate) -> AppResult<Profile> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(AppError::validation("First and last name are required"));
    }
    check_enrollment(conn, &input.batch_id, input.semester_number)?;
    db::users::update_student(
        conn,
        id,
        input.first_name.trim(),
        input.last_name.trim(),
        &input.batch_id,
        input.semester_number,
    )
}

pub fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".into())
}

/// Check credentials and open a session. Returns `(token, profile)`.
pub fn login(
    conn: &Connection,
    email: &str,
    password: &str,
    now: NaiveDateTime,
    ttl_hours: u32,
) -> AppResult<(String, Profile)> {
    let (user_id, hash) =
        db::users::find_credentials(conn, email)?.ok_or_else(invalid_credentials)?;
    if !verify_password(password, &hash) {
        return Err(invalid_credentials());
    }
    open_session(conn, &user_id, now, ttl_hours)
}

/// Session for a user whose password was already verified.
pub fn open_session(
    conn: &Connection,
    user_id: &str,
    now: NaiveDateTime,
    ttl_hours: u32,
) -> AppResult<(String, Profile)> {
    let profile = db::users::load_profile(conn, user_id)?.ok_or_else(invalid_credentials)?;
    db::sessions::purge_expired(conn, now)?;
    let token = db::sessions::create_session(conn, user_id, now, ttl_hours)?;

    tracing::debug!(user = %profile.email, "session opened");
    Ok((token, profile))
}

/// Profile behind a live bearer token.
pub fn profile_for_token(
    conn: &Connection,
    token: &str,
    now: NaiveDateTime,
) -> AppResult<Option<Profile>> {
    match db::sessions::find_session_user(conn, token, now)? {
        Some(user_id) => db::users::load_profile(conn, &user_id),
        None => Ok(None),
    }
}
