pub mod analytics;
pub mod auth;
pub mod backup;
pub mod bulk;
pub mod config;
pub mod export;
pub mod gate;
pub mod log;
pub mod questions;
pub mod schedule;
pub mod submission;
pub mod window;
