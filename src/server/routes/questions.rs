use crate::core::questions;
use crate::db;
use crate::errors::AppResult;
use crate::models::question::QuestionInput;
use crate::server::auth::{require_admin, require_student};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct QuestionFilter {
    batch_id: Option<String>,
    semester_number: Option<i64>,
}

#[get("/questions")]
async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<QuestionFilter>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let db = state.db.lock().await;
    let rows =
        db::questions::list_questions(&db.conn, query.batch_id.as_deref(), query.semester_number)?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Questions the caller has to answer with each submission.
#[get("/questions/mine")]
async fn mine(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let (_, enrollment) = require_student(&req, &state).await?;
    let Some(sp) = enrollment else {
        return Ok(HttpResponse::Ok().json(json!([])));
    };
    let db = state.db.lock().await;
    let rows =
        db::questions::list_questions(&db.conn, Some(&sp.batch_id), Some(sp.semester_number))?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/questions")]
async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<QuestionInput>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let db = state.db.lock().await;
    let question = questions::create_question(&db.conn, &body)?;
    db::log::ttlog_quiet(
        &db.conn,
        "create",
        &format!("question:{}", question.id),
        &question.question_text,
    );
    Ok(HttpResponse::Created().json(question))
}

#[put("/questions/{id}")]
async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<QuestionInput>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    let question = questions::update_question(&db.conn, &id, &body)?;
    db::log::ttlog_quiet(&db.conn, "update", &format!("question:{id}"), &question.question_text);
    Ok(HttpResponse::Ok().json(question))
}

#[delete("/questions/{id}")]
async fn remove(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    db::questions::delete_question(&db.conn, &id)?;
    db::log::ttlog_quiet(&db.conn, "delete", &format!("question:{id}"), "Question deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Question deleted" })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(mine)
        .service(list)
        .service(create)
        .service(update)
        .service(remove);
}
