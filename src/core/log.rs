use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, muted};
use crate::utils::colors::{RESET, color_for_operation};
use crate::utils::table::{Column, Table};

const MAX_TARGET: usize = 40;

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    /// Print the internal `log` table, oldest first. `limit` keeps the newest N rows.
    pub fn print_log(pool: &mut DbPool, limit: Option<u32>) -> AppResult<()> {
        let entries = load_log(&pool.conn, limit)?;

        header("Internal log");
        if entries.is_empty() {
            muted("(empty)");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ID", 3),
            Column::new("DATE", 19),
            Column::new("OPERATION", 9),
            Column::new("TARGET", 6),
            Column::new("MESSAGE", 7),
        ]);

        for e in &entries {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|_| e.date.clone());

            table.add_row(vec![
                e.id.to_string(),
                date,
                e.operation.clone(),
                truncate(&e.target, MAX_TARGET),
                e.message.clone(),
            ]);
        }

        // header + separator, then one line per entry
        let rendered = table.render();
        let mut lines = rendered.lines();
        for line in lines.by_ref().take(2) {
            println!("{line}");
        }
        for (line, e) in lines.zip(&entries) {
            let color = color_for_operation(&e.operation);
            let cell = format!("  {}", e.operation);
            println!("{}", line.replacen(&cell, &format!("  {color}{}{RESET}", e.operation), 1));
        }

        Ok(())
    }
}
