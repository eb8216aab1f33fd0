use crate::db;
use crate::errors::AppResult;
use crate::models::batch::BatchInput;
use crate::server::auth::{require_admin, require_user};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde_json::json;

#[get("/batches")]
async fn list(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    require_user(&req, &state).await?;
    let db = state.db.lock().await;
    Ok(HttpResponse::Ok().json(db::batches::list_batches(&db.conn)?))
}

#[post("/batches")]
async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<BatchInput>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let db = state.db.lock().await;
    let batch = db::batches::insert_batch(&db.conn, &body.name)?;
    db::log::ttlog_quiet(&db.conn, "create", &format!("batch:{}", batch.id), &batch.name);
    Ok(HttpResponse::Created().json(batch))
}

#[put("/batches/{id}")]
async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BatchInput>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    let batch = db::batches::rename_batch(&db.conn, &id, &body.name)?;
    db::log::ttlog_quiet(&db.conn, "update", &format!("batch:{}", batch.id), &batch.name);
    Ok(HttpResponse::Ok().json(batch))
}

#[delete("/batches/{id}")]
async fn remove(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let id = path.into_inner();
    let db = state.db.lock().await;
    db::batches::delete_batch(&db.conn, &id)?;
    db::log::ttlog_quiet(&db.conn, "delete", &format!("batch:{id}"), "Batch deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Batch deleted" })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(create)
        .service(update)
        .service(remove);
}
