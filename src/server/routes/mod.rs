pub mod auth;
pub mod batches;
pub mod dashboard;
pub mod feedback;
pub mod questions;
pub mod schedule;
pub mod students;
pub mod subjects;
pub mod timetables;

use crate::server::state::AppState;
use crate::utils::time::format_timestamp;
use actix_web::error::InternalError;
use actix_web::{HttpResponse, get, web};
use serde_json::json;

/// Malformed bodies and query strings answer `400 {error}` like every other
/// validation failure.
fn bad_request(err: impl std::fmt::Display + std::fmt::Debug + 'static) -> actix_web::Error {
    let body = json!({ "error": err.to_string() });
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

#[get("/health")]
async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": format_timestamp(state.now()),
    }))
}

/// Mount the whole API under `/api`. Used by `serve` and by tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| bad_request(err)))
        .service(
            web::scope("/api")
                .service(health)
                .configure(auth::configure)
                .configure(batches::configure)
                .configure(students::configure)
                .configure(subjects::configure)
                .configure(timetables::configure)
                .configure(feedback::configure)
                .configure(dashboard::configure)
                .configure(questions::configure)
                .configure(schedule::configure),
        );
}
