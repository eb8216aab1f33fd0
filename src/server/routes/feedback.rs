use crate::core::analytics::{self, DEFAULT_TREND_DAYS};
use crate::core::submission::{FeedbackSubmission, SubmissionPolicy, submit_feedback};
use crate::db;
use crate::errors::AppResult;
use crate::models::feedback::FeedbackResponseInput;
use crate::server::auth::{require_admin, require_student, require_user};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use serde::Deserialize;
use serde_json::json;

const RECENT_LIMIT: u32 = 5;
const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    page: Option<u32>,
    page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TrendsQuery {
    timeframe_days: Option<u32>,
    batch_id: Option<String>,
    semester_number: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AnalyticsQuery {
    batch_id: Option<String>,
    semester_number: Option<i64>,
}

/// Admins see everything, students their own records.
#[get("/feedback")]
async fn list(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    let db = state.db.lock().await;
    let records = if user.is_admin {
        db::feedback::list_all(&db.conn)?
    } else {
        db::feedback::list_for_student(&db.conn, &user.id)?
    };
    Ok(HttpResponse::Ok().json(records))
}

#[post("/feedback")]
async fn submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<FeedbackSubmission>,
) -> AppResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    let policy = SubmissionPolicy {
        now: state.now(),
        grace_minutes: state.config.grace_minutes,
        enforce_window: state.config.enforce_feedback_window,
    };

    let db = state.db.lock().await;
    let record = submit_feedback(&db.conn, &user, &body, policy)?;
    Ok(HttpResponse::Created().json(record))
}

#[get("/feedback/history")]
async fn history(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> AppResult<HttpResponse> {
    let (user, _) = require_student(&req, &state).await?;
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let db = state.db.lock().await;
    let (items, total) = db::feedback::history_page(&db.conn, &user.id, page, page_size)?;
    Ok(HttpResponse::Ok().json(json!({
        "items": items,
        "total": total,
        "page": page,
        "page_size": page_size,
    })))
}

#[get("/feedback/recent")]
async fn recent(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let db = state.db.lock().await;
    Ok(HttpResponse::Ok().json(db::feedback::recent(&db.conn, RECENT_LIMIT)?))
}

#[get("/feedback/trends")]
async fn trends(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<TrendsQuery>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let days = query.timeframe_days.unwrap_or(DEFAULT_TREND_DAYS).max(1);

    let db = state.db.lock().await;
    let points = analytics::daily_trends(
        &db.conn,
        state.now(),
        days,
        query.batch_id.as_deref(),
        query.semester_number,
    )?;
    Ok(HttpResponse::Ok().json(points))
}

#[get("/feedback/analytics")]
async fn subject_analytics(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<AnalyticsQuery>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let db = state.db.lock().await;
    let rows =
        analytics::subject_analytics(&db.conn, query.batch_id.as_deref(), query.semester_number)?;
    Ok(HttpResponse::Ok().json(rows))
}

#[put("/feedback/{id}/seen")]
async fn mark_seen(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let (user, _) = require_student(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    Ok(HttpResponse::Ok().json(db::feedback::mark_seen(&db.conn, &id, &user.id)?))
}

#[put("/feedback/{id}")]
async fn respond(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<FeedbackResponseInput>,
) -> AppResult<HttpResponse> {
    let admin = require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    let record = db::feedback::respond(
        &db.conn,
        &id,
        body.admin_response.as_deref(),
        body.is_response_seen_by_student,
    )?;
    db::log::ttlog_quiet(&db.conn, "respond", &format!("feedback:{id}"), &admin.email);
    Ok(HttpResponse::Ok().json(record))
}

/// Own feedback with an admin response not yet acknowledged.
#[get("/notifications")]
async fn notifications(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let (user, _) = require_student(&req, &state).await?;
    let db = state.db.lock().await;
    Ok(HttpResponse::Ok().json(db::feedback::unseen_responses(&db.conn, &user.id)?))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(history)
        .service(recent)
        .service(trends)
        .service(subject_analytics)
        .service(list)
        .service(submit)
        .service(mark_seen)
        .service(respond)
        .service(notifications);
}
