use crate::core::auth;
use crate::db;
use crate::db::users::NewUser;
use crate::errors::{AppError, AppResult};
use crate::models::Profile;
use crate::models::profile::RegisterInput;
use crate::server::auth::{bearer_token, off_worker, require_user};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct LoginInput {
    email: String,
    password: String,
}

fn user_json(p: &Profile) -> serde_json::Value {
    json!({ "id": p.id, "email": p.email, "profile": p })
}

#[post("/auth/login")]
async fn login(state: web::Data<AppState>, body: web::Json<LoginInput>) -> AppResult<HttpResponse> {
    let LoginInput { email, password } = body.into_inner();

    let credentials = {
        let db = state.db.lock().await;
        db::users::find_credentials(&db.conn, &email)?
    };
    let (user_id, hash) = credentials.ok_or_else(auth::invalid_credentials)?;
    if !off_worker(move || Ok(auth::verify_password(&password, &hash))).await? {
        return Err(auth::invalid_credentials());
    }

    let db = state.db.lock().await;
    let (token, user_profile) = auth::open_session(
        &db.conn,
        &user_id,
        state.now(),
        state.config.session_ttl_hours,
    )?;
    Ok(HttpResponse::Ok().json(json!({ "token": token, "user": user_json(&user_profile) })))
}

#[post("/auth/register")]
async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterInput>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    auth::check_credentials_shape(&input.email, &input.password)?;

    let user = auth::registration(&input);
    let password_hash = off_worker(move || auth::hash_password(&input.password)).await?;

    let db = state.db.lock().await;
    let user_profile = auth::store_account(&db.conn, NewUser { password_hash, ..user })?;
    Ok(HttpResponse::Created().json(json!({ "user": user_json(&user_profile) })))
}

#[post("/auth/logout")]
async fn logout(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    require_user(&req, &state).await?;
    let token = bearer_token(&req)
        .ok_or_else(|| AppError::Unauthorized("Missing or invalid Authorization header".into()))?;

    let db = state.db.lock().await;
    db::sessions::delete_session(&db.conn, token)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Logged out" })))
}

#[get("/profile")]
async fn profile(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(register)
        .service(logout)
        .service(profile);
}
