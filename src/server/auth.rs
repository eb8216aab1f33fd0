//! Caller identification. The session is resolved per request from the
//! `Authorization: Bearer <token>` header and handed to the handler.

use crate::core::auth::profile_for_token;
use crate::errors::{AppError, AppResult};
use crate::models::{Profile, StudentProfile};
use crate::server::state::AppState;
use actix_web::{HttpRequest, web};
use actix_web::http::header::AUTHORIZATION;

pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn require_user(req: &HttpRequest, state: &AppState) -> AppResult<Profile> {
    let token = bearer_token(req)
        .ok_or_else(|| AppError::Unauthorized("Missing or invalid Authorization header".into()))?;

    let db = state.db.lock().await;
    profile_for_token(&db.conn, token, state.now())?
        .ok_or_else(|| AppError::Unauthorized("Session expired or invalid".into()))
}

pub async fn require_admin(req: &HttpRequest, state: &AppState) -> AppResult<Profile> {
    let user = require_user(req, state).await?;
    if !user.is_admin {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    Ok(user)
}

/// A non-admin caller, with enrollment if the profile has one.
pub async fn require_student(
    req: &HttpRequest,
    state: &AppState,
) -> AppResult<(Profile, Option<StudentProfile>)> {
    let user = require_user(req, state).await?;
    if user.is_admin {
        return Err(AppError::Forbidden("Student access required".into()));
    }
    let enrollment = user.student_profile();
    Ok((user, enrollment))
}

/// Password hashing and verification run on the blocking pool, outside the db lock.
pub async fn off_worker<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Other(e.to_string()))?
}
