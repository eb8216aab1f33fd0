/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Color for a `log` table operation.
pub fn color_for_operation(op: &str) -> &'static str {
    match op {
        "create" | "feedback" | "user_created" | "init" => GREEN,
        "delete" => RED,
        "update" | "respond" => YELLOW,
        "migration_applied" | "backup" | "export" => CYAN,
        _ => RESET,
    }
}
