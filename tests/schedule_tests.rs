use feedback_portal::core::gate::{FeedbackGate, pick_active, status_for};
use feedback_portal::core::schedule::{resolve_todays_subjects, weekly_timetable};
use feedback_portal::core::submission::{FeedbackSubmission, SubmissionPolicy, submit_feedback};
use feedback_portal::models::StudentProfile;

mod common;
use common::{SEMESTER, add_session, fixture, monday};

const GRACE: u32 = 15;

fn submit(f: &common::Fixture, class_id: &str, at: chrono::NaiveDateTime) {
    submit_feedback(
        &f.pool.conn,
        &f.student(),
        &FeedbackSubmission {
            class_id: class_id.to_string(),
            batch_id: None,
            semester_number: None,
            rating: 4,
            comment: None,
            additional_feedback: vec![],
        },
        SubmissionPolicy {
            now: at,
            grace_minutes: GRACE,
            enforce_window: true,
        },
    )
    .expect("submission accepted");
}

#[test]
fn test_resolver_orders_by_start_time() {
    let f = fixture();
    // added after the 09:00 and 10:00 classes, but earlier in the day
    let early = common::add_subject(&f.pool, &f.batch_id, "Chemistry");
    add_session(&f.pool, &f.batch_id, &early, 1, "08:00", "08:45");

    let subjects = resolve_todays_subjects(
        &f.pool.conn,
        monday(8, 0).date(),
        &f.batch_id,
        SEMESTER,
        &f.student_id,
        GRACE,
    )
    .unwrap();

    let names: Vec<&str> = subjects.iter().map(|s| s.subject_name()).collect();
    assert_eq!(names, ["Chemistry", "Mathematics", "Physics"]);
    assert!(subjects.iter().all(|s| !s.already_submitted));
}

#[test]
fn test_resolver_returns_nothing_on_free_day() {
    let f = fixture();
    // 2025-01-07 is a Tuesday
    let tuesday = monday(9, 0).date().succ_opt().unwrap();

    let subjects =
        resolve_todays_subjects(&f.pool.conn, tuesday, &f.batch_id, SEMESTER, &f.student_id, GRACE)
            .unwrap();
    assert!(subjects.is_empty());
}

#[test]
fn test_resolver_keeps_repeated_subject_as_separate_entries() {
    let f = fixture();
    add_session(&f.pool, &f.batch_id, &f.subject_a, 1, "14:00", "14:50");

    let subjects = resolve_todays_subjects(
        &f.pool.conn,
        monday(9, 0).date(),
        &f.batch_id,
        SEMESTER,
        &f.student_id,
        GRACE,
    )
    .unwrap();

    let math = subjects.iter().filter(|s| s.class_id() == f.subject_a).count();
    assert_eq!(subjects.len(), 3);
    assert_eq!(math, 2);
}

#[test]
fn test_submitted_subject_is_flagged_inside_window() {
    let f = fixture();
    submit(&f, &f.subject_a, monday(9, 20));

    let now = monday(9, 30);
    let subjects = resolve_todays_subjects(
        &f.pool.conn,
        now.date(),
        &f.batch_id,
        SEMESTER,
        &f.student_id,
        GRACE,
    )
    .unwrap();

    let a = subjects.iter().find(|s| s.class_id() == f.subject_a).unwrap();
    let b = subjects.iter().find(|s| s.class_id() == f.subject_b).unwrap();
    assert!(a.already_submitted);
    assert!(!b.already_submitted);

    let status = status_for(&subjects, now);
    assert_eq!(status.active_subject.as_ref().unwrap().class_id(), f.subject_a);
    assert!(status.already_submitted);
    assert!(!status.is_open());
}

#[test]
fn test_gate_picks_first_open_window() {
    let f = fixture();
    let subjects = resolve_todays_subjects(
        &f.pool.conn,
        monday(0, 0).date(),
        &f.batch_id,
        SEMESTER,
        &f.student_id,
        GRACE,
    )
    .unwrap();

    let active = |h, m| pick_active(&subjects, monday(h, m)).map(|s| s.subject_name().to_string());

    assert_eq!(active(9, 10).as_deref(), Some("Mathematics"));
    // still in Mathematics' grace period; Physics also open, first one wins
    assert_eq!(active(10, 5).as_deref(), Some("Mathematics"));
    assert_eq!(active(10, 6).as_deref(), Some("Physics"));
    assert_eq!(active(11, 5).as_deref(), Some("Physics"));
    assert_eq!(active(11, 6), None);
    assert_eq!(active(8, 59), None);
}

#[test]
fn test_gate_evaluate_without_enrollment_is_inactive() {
    let f = fixture();
    let gate = FeedbackGate::new(GRACE);

    let status = gate.evaluate(&f.pool.conn, None, monday(9, 10));
    assert!(status.active_subject.is_none());
    assert!(!status.already_submitted);
}

#[test]
fn test_gate_evaluate_for_enrolled_student() {
    let f = fixture();
    let gate = FeedbackGate::new(GRACE);
    let sp = f.student().student_profile().unwrap();

    let status = gate.evaluate(&f.pool.conn, Some(&sp), monday(9, 10));
    assert!(status.is_open());
    assert_eq!(
        status.active_subject.unwrap().subject_name(),
        "Mathematics"
    );
}

#[test]
fn test_gate_degrades_silently_when_lookup_fails() {
    let f = fixture();
    let gate = FeedbackGate::new(GRACE);
    let sp = StudentProfile {
        student_id: f.student_id.clone(),
        batch_id: f.batch_id.clone(),
        semester_number: SEMESTER,
    };

    f.pool.conn.execute_batch("DROP TABLE timetables;").unwrap();

    let status = gate.evaluate(&f.pool.conn, Some(&sp), monday(9, 10));
    assert!(status.active_subject.is_none());
}

#[test]
fn test_gate_watch_stops_after_max_ticks() {
    let f = fixture();
    let gate = FeedbackGate::new(GRACE);
    let sp = f.student().student_profile().unwrap();

    let mut seen = Vec::new();
    gate.watch(&f.pool.conn, Some(&sp), || monday(10, 20), Some(1), |now, status| {
        seen.push((now, status.is_open()));
        true
    });

    assert_eq!(seen, vec![(monday(10, 20), true)]);
}

#[test]
fn test_weekly_timetable_groups_by_day() {
    let f = fixture();
    add_session(&f.pool, &f.batch_id, &f.subject_b, 3, "11:00", "11:50");

    let week = weekly_timetable(&f.pool.conn, &f.batch_id, SEMESTER).unwrap();

    assert_eq!(week.len(), 7);
    assert_eq!(week[0].0, 1);
    assert_eq!(week[0].1.len(), 2);
    assert_eq!(week[2].1.len(), 1);
    assert!(week[6].1.is_empty());
}
