use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::gate::{FeedbackGate, GateStatus, status_for};
use crate::core::schedule::{DailySubject, resolve_todays_subjects};
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info, muted, success, warning};
use crate::utils::colors::{GREEN, GREY, RESET, YELLOW};
use crate::utils::date::{self, weekday_name};
use crate::utils::table::{Column, Table};
use crate::utils::time::{format_hhmm, parse_datetime};
use chrono::NaiveDateTime;

fn print_subjects(subjects: &[DailySubject], now: NaiveDateTime) {
    if subjects.is_empty() {
        muted("No classes scheduled.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("TIME", 11),
        Column::new("SUBJECT", 7),
        Column::new("FEEDBACK UNTIL", 14),
        Column::new("STATUS", 6),
    ]);

    for s in subjects {
        let until = s
            .window
            .map(|w| format_hhmm(w.closes_at.time()))
            .unwrap_or_else(|| "--".into());
        let status = if s.already_submitted {
            "submitted"
        } else if s.window.is_some_and(|w| w.contains(now)) {
            "open"
        } else if s.window.is_some_and(|w| now < w.opens_at) {
            "upcoming"
        } else {
            "closed"
        };

        table.add_row(vec![
            format!(
                "{}-{}",
                format_hhmm(s.session.start_time),
                format_hhmm(s.session.end_time)
            ),
            s.subject_name().to_string(),
            until,
            status.to_string(),
        ]);
    }
    print!("{}", table.render());
}

fn print_status(now: NaiveDateTime, status: &GateStatus) {
    let stamp = now.format("%H:%M");
    match &status.active_subject {
        None => println!("{GREY}[{stamp}]{RESET} No class is accepting feedback right now."),
        Some(s) if status.already_submitted => println!(
            "{YELLOW}[{stamp}]{RESET} {}: feedback already submitted.",
            s.subject_name()
        ),
        Some(s) => println!(
            "{GREEN}[{stamp}]{RESET} {}: feedback is open.",
            s.subject_name()
        ),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Today { student, at, watch } = cmd else {
        return Ok(());
    };

    let pool = open_db(cfg)?;
    let profile = db::users::find_profile_by_email(&pool.conn, student)?
        .ok_or_else(|| AppError::NotFound(format!("Student {student}")))?;

    let Some(sp) = profile.student_profile() else {
        warning(format!(
            "{} has no batch/semester assigned: nothing to show.",
            profile.email
        ));
        return Ok(());
    };

    let gate = FeedbackGate::new(cfg.grace_minutes);

    if *watch {
        info(format!(
            "Watching {} (Ctrl+C to stop)…",
            profile.display_name()
        ));
        gate.watch(&pool.conn, Some(&sp), date::now, None, |now, status| {
            print_status(now, status);
            true
        });
        return Ok(());
    }

    let now = match at {
        Some(raw) => parse_datetime(raw)?,
        None => date::now(),
    };

    let subjects = resolve_todays_subjects(
        &pool.conn,
        now.date(),
        &sp.batch_id,
        sp.semester_number,
        &sp.student_id,
        cfg.grace_minutes,
    )?;

    header(format!(
        "{} · {} {}",
        profile.display_name(),
        weekday_name(date::day_of_week(now.date())),
        now.format("%Y-%m-%d %H:%M")
    ));
    print_subjects(&subjects, now);
    println!();

    let status = status_for(&subjects, now);
    print_status(now, &status);
    if status.is_open() {
        success("Submission allowed.");
    }

    Ok(())
}
