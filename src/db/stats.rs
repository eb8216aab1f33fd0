use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::date::parse_date;
use rusqlite::OptionalExtension;
use std::fs;

const COUNTED_TABLES: &[(&str, &str)] = &[
    ("Users", "users"),
    ("Batches", "batches"),
    ("Subjects", "subjects"),
    ("Timetable", "timetables"),
    ("Questions", "feedback_questions"),
    ("Feedback", "feedback"),
];

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let mut feedback_count = 0_i64;
    for (label, table) in COUNTED_TABLES {
        let count: i64 =
            pool.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        if *table == "feedback" {
            feedback_count = count;
        }
        println!("{}• {:<10}{} {}{}{}", CYAN, format!("{label}:"), RESET, GREEN, count, RESET);
    }

    //
    // 3) FEEDBACK DATE RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT substr(created_at, 1, 10) FROM feedback ORDER BY created_at ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT substr(created_at, 1, 10) FROM feedback ORDER BY created_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first.clone().unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last.clone().unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Feedback range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 4) AVERAGE FEEDBACK/DAY
    //
    if let (Some(d1), Some(d2)) = (
        first.as_deref().and_then(parse_date),
        last.as_deref().and_then(parse_date),
    ) {
        let days = (d2 - d1).num_days().max(1);
        let avg = feedback_count as f64 / days as f64;
        println!("{}• Average feedback/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
