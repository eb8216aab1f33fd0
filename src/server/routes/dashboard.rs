use crate::core::analytics;
use crate::errors::AppResult;
use crate::server::auth::require_admin;
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, get, web};

#[get("/dashboard/stats")]
async fn stats(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    require_admin(&req, &state).await?;
    let db = state.db.lock().await;
    Ok(HttpResponse::Ok().json(analytics::dashboard_stats(&db.conn, state.now())?))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(stats);
}
