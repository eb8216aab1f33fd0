use crate::core::bulk;
use crate::db;
use crate::errors::AppResult;
use crate::models::timetable::{TimetableFilter, TimetableInput};
use crate::server::auth::{require_admin, require_user};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;

#[get("/timetables")]
async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<TimetableFilter>,
) -> AppResult<HttpResponse> {
    require_user(&req, &state).await?;
    let db = state.db.lock().await;
    Ok(HttpResponse::Ok().json(db::timetables::list_sessions(&db.conn, &query)?))
}

#[post("/timetables")]
async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<TimetableInput>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let db = state.db.lock().await;
    let session = db::timetables::insert_session(&db.conn, &body)?;
    db::log::ttlog_quiet(
        &db.conn,
        "create",
        &format!("timetable:{}", session.id),
        session.subject_name.as_deref().unwrap_or_default(),
    );
    Ok(HttpResponse::Created().json(session))
}

#[derive(Debug, Deserialize)]
struct BulkTimetables {
    #[serde(default)]
    timetables: Vec<TimetableInput>,
}

#[post("/timetables/bulk")]
async fn create_bulk(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<BulkTimetables>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let rows = body.into_inner().timetables;
    bulk::check_rows(&rows, "timetable entries")?;

    let db = state.db.lock().await;
    // rows go in order, so a later row overlapping an earlier one fails
    let report = bulk::create_each(
        rows,
        |t| format!("day {} {}-{}", t.day_of_week, t.start_time, t.end_time),
        |t| db::timetables::insert_session(&db.conn, &t),
        |session| session.id.clone(),
    );
    bulk::audit(&db.conn, "timetables:bulk", &report);
    Ok(HttpResponse::Ok().json(report))
}

#[put("/timetables/{id}")]
async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<TimetableInput>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    let session = db::timetables::update_session(&db.conn, &id, &body)?;
    db::log::ttlog_quiet(
        &db.conn,
        "update",
        &format!("timetable:{id}"),
        session.subject_name.as_deref().unwrap_or_default(),
    );
    Ok(HttpResponse::Ok().json(session))
}

#[delete("/timetables/{id}")]
async fn remove(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    db::timetables::delete_session(&db.conn, &id)?;
    db::log::ttlog_quiet(&db.conn, "delete", &format!("timetable:{id}"), "Timetable entry deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Timetable entry deleted" })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(create_bulk)
        .service(create)
        .service(update)
        .service(remove);
}
