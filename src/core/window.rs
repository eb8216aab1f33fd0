//! Feedback window arithmetic.
//!
//! A class accepts feedback from its start time until its end time plus a
//! grace period, both ends inclusive, on the same calendar day. All values are
//! naive local times: whatever the host clock says.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

pub const DEFAULT_GRACE_MINUTES: u32 = 15;

/// The closed interval `[opens_at, closes_at]` for one class on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackWindow {
    pub opens_at: NaiveDateTime,
    pub closes_at: NaiveDateTime,
}

impl FeedbackWindow {
    /// `None` for a session that ends before it starts (crosses midnight).
    pub fn for_session(
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        grace_minutes: u32,
    ) -> Option<Self> {
        if end_time < start_time {
            return None;
        }
        Some(Self {
            opens_at: date.and_time(start_time),
            closes_at: date.and_time(end_time) + Duration::minutes(i64::from(grace_minutes)),
        })
    }

    pub fn contains(&self, now: NaiveDateTime) -> bool {
        now >= self.opens_at && now <= self.closes_at
    }
}

/// True when `now` falls inside the class window built on `now`'s own date.
pub fn is_within_feedback_window(
    now: NaiveDateTime,
    start_time: NaiveTime,
    end_time: NaiveTime,
    grace_minutes: u32,
) -> bool {
    FeedbackWindow::for_session(now.date(), start_time, end_time, grace_minutes)
        .is_some_and(|w| w.contains(now))
}
