//! CLI user-facing messages. Server code logs through `tracing` instead.

use crate::utils::colors::{CYAN, GREEN, GREY, RED, RESET, YELLOW};
use std::fmt;

const BOLD: &str = "\x1b[1m";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{CYAN}{BOLD}ℹ️{RESET} {msg}");
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{GREEN}{BOLD}✅{RESET} {msg}");
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{YELLOW}{BOLD}⚠️{RESET} {msg}");
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{RED}{BOLD}❌{RESET} {msg}");
}

/// Aligned `label: value` line used by info listings.
pub fn detail<T: fmt::Display>(label: &str, value: T) {
    println!("{CYAN}• {label:<14}{RESET} {value}");
}

pub fn header<T: fmt::Display>(msg: T) {
    println!("{CYAN}{BOLD}== {msg} =={RESET}");
}

pub fn muted<T: fmt::Display>(msg: T) {
    println!("{GREY}{msg}{RESET}");
}
