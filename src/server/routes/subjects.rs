use crate::core::{analytics, bulk};
use crate::db;
use crate::errors::AppResult;
use crate::models::subject::SubjectInput;
use crate::server::auth::{require_admin, require_user};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
struct SubjectFilter {
    batch_id: Option<String>,
    semester_number: Option<i64>,
}

#[get("/subjects")]
async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<SubjectFilter>,
) -> AppResult<HttpResponse> {
    require_user(&req, &state).await?;
    let db = state.db.lock().await;
    let subjects =
        db::subjects::list_subjects(&db.conn, query.batch_id.as_deref(), query.semester_number)?;
    Ok(HttpResponse::Ok().json(subjects))
}

/// Count and average per subject, only subjects that have feedback.
#[get("/subjects/stats")]
async fn stats(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let db = state.db.lock().await;
    Ok(HttpResponse::Ok().json(analytics::subject_stats(&db.conn)?))
}

#[post("/subjects")]
async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SubjectInput>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let db = state.db.lock().await;
    let subject = db::subjects::insert_subject(&db.conn, &body)?;
    db::log::ttlog_quiet(&db.conn, "create", &format!("subject:{}", subject.id), &subject.name);
    Ok(HttpResponse::Created().json(subject))
}

#[derive(Debug, Deserialize)]
struct BulkSubjects {
    #[serde(default)]
    subjects: Vec<SubjectInput>,
}

#[post("/subjects/bulk")]
async fn create_bulk(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<BulkSubjects>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let subjects = body.into_inner().subjects;
    bulk::check_rows(&subjects, "subjects")?;

    let db = state.db.lock().await;
    let report = bulk::create_each(
        subjects,
        |s| s.name.clone(),
        |s| db::subjects::insert_subject(&db.conn, &s),
        |subject| subject.id.clone(),
    );
    bulk::audit(&db.conn, "subjects:bulk", &report);
    Ok(HttpResponse::Ok().json(report))
}

#[put("/subjects/{id}")]
async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SubjectInput>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    let subject = db::subjects::update_subject(&db.conn, &id, &body)?;
    db::log::ttlog_quiet(&db.conn, "update", &format!("subject:{id}"), &subject.name);
    Ok(HttpResponse::Ok().json(subject))
}

#[delete("/subjects/{id}")]
async fn remove(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    db::subjects::delete_subject(&db.conn, &id)?;
    db::log::ttlog_quiet(&db.conn, "delete", &format!("subject:{id}"), "Subject deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Subject deleted" })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(stats)
        .service(list)
        .service(create_bulk)
        .service(create)
        .service(update)
        .service(remove);
}
