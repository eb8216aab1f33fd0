use crate::core::{auth, bulk};
use crate::db;
use crate::errors::AppResult;
use crate::models::profile::{StudentInput, StudentUpdate};
use crate::server::auth::{off_worker, require_admin};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;

#[get("/students")]
async fn list(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let db = state.db.lock().await;
    Ok(HttpResponse::Ok().json(db::users::list_students(&db.conn)?))
}

#[post("/students")]
async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<StudentInput>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let input = body.into_inner();
    let user = off_worker(move || auth::prepare_student(&input)).await?;

    let db = state.db.lock().await;
    let profile = auth::store_account(&db.conn, user)?;
    Ok(HttpResponse::Created().json(profile))
}

#[derive(Debug, Deserialize)]
struct BulkStudents {
    #[serde(default)]
    students: Vec<StudentInput>,
}

#[post("/students/bulk")]
async fn create_bulk(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<BulkStudents>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let students = body.into_inner().students;
    bulk::check_rows(&students, "students")?;

    // hash every row first so the db lock is only held for the inserts
    let prepared = off_worker(move || {
        Ok(students
            .iter()
            .map(|s| (s.email.clone(), auth::prepare_student(s)))
            .collect::<Vec<_>>())
    })
    .await?;

    let db = state.db.lock().await;
    let report = bulk::create_each(
        prepared,
        |(email, _)| email.clone(),
        |(_, user)| auth::store_account(&db.conn, user?),
        |profile| profile.id.clone(),
    );
    bulk::audit(&db.conn, "students:bulk", &report);
    Ok(HttpResponse::Ok().json(report))
}

#[put("/students/{id}")]
async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StudentUpdate>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    let profile = auth::update_student(&db.conn, &id, &body)?;
    db::log::ttlog_quiet(&db.conn, "update", &format!("student:{id}"), &profile.email);
    Ok(HttpResponse::Ok().json(profile))
}

#[delete("/students/{id}")]
async fn remove(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    db::users::delete_student(&db.conn, &id)?;
    db::log::ttlog_quiet(&db.conn, "delete", &format!("student:{id}"), "Student deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Student deleted" })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(create_bulk)
        .service(create)
        .service(update)
        .service(remove);
}
