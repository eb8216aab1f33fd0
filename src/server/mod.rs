//! REST API (actix-web) over the same SQLite database the CLI uses.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use actix_web::{App, HttpServer, middleware, web};
use state::{AppState, Clock};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG` wins over the configured filter. Safe to call more than once.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Run the HTTP server until interrupted.
pub fn serve(cfg: &Config, bind: Option<String>, port: Option<u16>) -> AppResult<()> {
    cfg.validate()?;
    init_tracing(&cfg.log_filter);

    let pool = DbPool::new(&cfg.database)?;
    let applied = init_db(&pool.conn)?;
    if applied > 0 {
        tracing::info!(applied, "database migrated");
    }

    let host = bind.unwrap_or_else(|| cfg.bind_address.clone());
    let port = port.unwrap_or(cfg.port);
    let state = web::Data::new(AppState::new(pool, cfg.clone(), Clock::System));

    tracing::info!(database = %cfg.database, "listening on http://{host}:{port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(middleware::Logger::default())
                .configure(routes::configure)
        })
        .bind((host.as_str(), port))?
        .run()
        .await
    })?;

    tracing::info!("server stopped");
    Ok(())
}
