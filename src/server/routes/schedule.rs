use crate::core::gate::{FeedbackGate, GateStatus, POLL_INTERVAL};
use crate::core::schedule::{resolve_todays_subjects, weekly_timetable};
use crate::errors::AppResult;
use crate::server::auth::require_student;
use crate::server::state::AppState;
use crate::utils::date::{day_of_week, weekday_name};
use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActiveResponse {
    #[serde(flatten)]
    status: GateStatus,
    poll_interval_seconds: u64,
}

/// Today's classes for the caller, each with its window and submitted flag.
#[get("/schedule/today")]
async fn today(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let (_, enrollment) = require_student(&req, &state).await?;
    let now = state.now();
    let date = now.date();

    let subjects = match enrollment {
        Some(sp) => {
            let db = state.db.lock().await;
            resolve_todays_subjects(
                &db.conn,
                date,
                &sp.batch_id,
                sp.semester_number,
                &sp.student_id,
                state.config.grace_minutes,
            )?
        }
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(json!({
        "date": date.format("%Y-%m-%d").to_string(),
        "dayOfWeek": day_of_week(date),
        "subjects": subjects,
    })))
}

/// Gate status, meant to be polled every `pollIntervalSeconds`.
#[get("/schedule/active")]
async fn active(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let (_, enrollment) = require_student(&req, &state).await?;
    let gate = FeedbackGate::new(state.config.grace_minutes);

    let db = state.db.lock().await;
    let status = gate.evaluate(&db.conn, enrollment.as_ref(), state.now());

    Ok(HttpResponse::Ok().json(ActiveResponse {
        status,
        poll_interval_seconds: POLL_INTERVAL.as_secs(),
    }))
}

#[get("/schedule/week")]
async fn week(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let (_, enrollment) = require_student(&req, &state).await?;
    let Some(sp) = enrollment else {
        return Ok(HttpResponse::Ok().json(json!({ "days": [] })));
    };

    let db = state.db.lock().await;
    let days: Vec<_> = weekly_timetable(&db.conn, &sp.batch_id, sp.semester_number)?
        .into_iter()
        .map(|(day, sessions)| {
            json!({
                "dayOfWeek": day,
                "dayName": weekday_name(day),
                "sessions": sessions,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "days": days })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(today).service(active).service(week);
}
