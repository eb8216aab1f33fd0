//! Decides whether a student may submit feedback right now, and for which class.

use crate::core::schedule::{DailySubject, resolve_todays_subjects};
use crate::models::StudentProfile;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;
use std::time::Duration;

/// How often the gate is re-evaluated. Fixed, not a config key.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateStatus {
    pub active_subject: Option<DailySubject>,
    pub already_submitted: bool,
}

impl GateStatus {
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.active_subject.is_some() && !self.already_submitted
    }
}

/// First subject, in start-time order, whose window contains `now`.
pub fn pick_active(subjects: &[DailySubject], now: NaiveDateTime) -> Option<&DailySubject> {
    subjects
        .iter()
        .find(|s| s.window.is_some_and(|w| w.contains(now)))
}

pub fn status_for(subjects: &[DailySubject], now: NaiveDateTime) -> GateStatus {
    match pick_active(subjects, now) {
        Some(active) => GateStatus {
            already_submitted: active.already_submitted,
            active_subject: Some(active.clone()),
        },
        None => GateStatus::inactive(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeedbackGate {
    pub grace_minutes: u32,
}

impl FeedbackGate {
    pub fn new(grace_minutes: u32) -> Self {
        Self { grace_minutes }
    }

    /// Never fails: a student without batch/semester, or a lookup error,
    /// both read as "no active subject".
    pub fn evaluate(
        &self,
        conn: &Connection,
        student: Option<&StudentProfile>,
        now: NaiveDateTime,
    ) -> GateStatus {
        let Some(student) = student else {
            return GateStatus::inactive();
        };

        match resolve_todays_subjects(
            conn,
            now.date(),
            &student.batch_id,
            student.semester_number,
            &student.student_id,
            self.grace_minutes,
        ) {
            Ok(subjects) => status_for(&subjects, now),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    student = %student.student_id,
                    "schedule lookup failed, reporting no active subject"
                );
                GateStatus::inactive()
            }
        }
    }

    /// Re-evaluate every [`POLL_INTERVAL`] and hand each status to `on_tick`.
    ///
    /// Stops after `max_ticks` evaluations, or when `on_tick` returns false.
    pub fn watch<C, F>(
        &self,
        conn: &Connection,
        student: Option<&StudentProfile>,
        mut clock: C,
        max_ticks: Option<usize>,
        mut on_tick: F,
    ) where
        C: FnMut() -> NaiveDateTime,
        F: FnMut(NaiveDateTime, &GateStatus) -> bool,
    {
        let mut ticks = 0usize;
        loop {
            let now = clock();
            let status = self.evaluate(conn, student, now);
            ticks += 1;

            if !on_tick(now, &status) || max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}
