use crate::config::Config;
use crate::db::pool::DbPool;
use crate::utils::date;
use chrono::NaiveDateTime;
use tokio::sync::Mutex;

/// Source of "now" for every time-dependent handler.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => date::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Shared by all workers through `web::Data`.
pub struct AppState {
    pub db: Mutex<DbPool>,
    pub config: Config,
    pub clock: Clock,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config, clock: Clock) -> Self {
        Self {
            db: Mutex::new(pool),
            config,
            clock,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }
}
