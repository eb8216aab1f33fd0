use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Local wall-clock time; the portal never normalizes time zones.
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// ISO weekday: 1 = Monday … 7 = Sunday (the `timetables.day_of_week` encoding).
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

pub fn weekday_name(day: u8) -> &'static str {
    match day {
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        7 => "Sunday",
        _ => "?",
    }
}

/// First instant of the day `days` days before `now`.
pub fn days_back(now: NaiveDateTime, days: u32) -> NaiveDateTime {
    let start = now.date() - Duration::days(i64::from(days));
    start.and_hms_opt(0, 0, 0).unwrap_or(now)
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
