mod common;
use common::{SEMESTER, add_session, add_subject, fixture};
use feedback_portal::db::timetables::{
    delete_session, insert_session, list_sessions, sessions_for_day, update_session,
};
use feedback_portal::core::gate::FeedbackGate;
use feedback_portal::db;
use feedback_portal::errors::AppError;
use feedback_portal::models::subject::SubjectInput;
use feedback_portal::models::timetable::{TimetableFilter, TimetableInput};

fn slot(batch_id: &str, class_id: &str, day: u8, start: &str, end: &str) -> TimetableInput {
    TimetableInput {
        day_of_week: day,
        class_id: class_id.to_string(),
        batch_id: batch_id.to_string(),
        semester_number: SEMESTER,
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

#[test]
fn test_day_sessions_ordered_by_start() {
    let f = fixture();
    let chem = add_subject(&f.pool, &f.batch_id, "Chemistry");
    add_session(&f.pool, &f.batch_id, &chem, 1, "08:00", "08:50");

    let day = sessions_for_day(&f.pool.conn, 1, &f.batch_id, SEMESTER).unwrap();
    let names: Vec<_> = day
        .iter()
        .map(|s| s.subject_name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["Chemistry", "Mathematics", "Physics"]);
}

#[test]
fn test_overlapping_session_rejected() {
    let f = fixture();
    let chem = add_subject(&f.pool, &f.batch_id, "Chemistry");

    let err = insert_session(&f.pool.conn, &slot(&f.batch_id, &chem, 1, "09:30", "10:10")).unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m.contains("Overlaps")));

    // back-to-back is fine
    assert!(insert_session(&f.pool.conn, &slot(&f.batch_id, &chem, 1, "09:50", "10:00")).is_ok());
    // other days are independent
    assert!(insert_session(&f.pool.conn, &slot(&f.batch_id, &chem, 2, "09:30", "10:10")).is_ok());
}

#[test]
fn test_start_must_precede_end() {
    let f = fixture();
    let err = insert_session(&f.pool.conn, &slot(&f.batch_id, &f.subject_a, 3, "11:00", "11:00")).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // crossing midnight is not representable
    let err = insert_session(&f.pool.conn, &slot(&f.batch_id, &f.subject_a, 3, "23:30", "00:20")).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn test_malformed_fields_rejected() {
    let f = fixture();
    let conn = &f.pool.conn;
    assert!(insert_session(conn, &slot(&f.batch_id, &f.subject_a, 3, "9am", "10:00")).is_err());
    assert!(insert_session(conn, &slot(&f.batch_id, &f.subject_a, 3, "25:00", "26:00")).is_err());
    assert!(insert_session(conn, &slot(&f.batch_id, &f.subject_a, 8, "09:00", "10:00")).is_err());
    assert!(insert_session(conn, &slot(&f.batch_id, &f.subject_a, 0, "09:00", "10:00")).is_err());

    let mut bad_sem = slot(&f.batch_id, &f.subject_a, 3, "09:00", "10:00");
    bad_sem.semester_number = 9;
    assert!(insert_session(conn, &bad_sem).is_err());
}

#[test]
fn test_unknown_subject_or_batch() {
    let f = fixture();
    let err = insert_session(&f.pool.conn, &slot(&f.batch_id, "missing", 3, "09:00", "10:00")).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = insert_session(&f.pool.conn, &slot("missing", &f.subject_a, 3, "09:00", "10:00")).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_update_ignores_its_own_slot() {
    let f = fixture();
    let day = sessions_for_day(&f.pool.conn, 1, &f.batch_id, SEMESTER).unwrap();
    let math = &day[0];

    // extend Mathematics by five minutes, still clear of Physics
    let updated = update_session(
        &f.pool.conn,
        &math.id,
        &slot(&f.batch_id, &f.subject_a, 1, "08:55", "09:55"),
    )
    .unwrap();
    assert_eq!(updated.start_time.format("%H:%M").to_string(), "08:55");

    // pushing into Physics still fails
    let err = update_session(
        &f.pool.conn,
        &math.id,
        &slot(&f.batch_id, &f.subject_a, 1, "09:00", "10:30"),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = update_session(&f.pool.conn, "missing", &slot(&f.batch_id, &f.subject_a, 4, "09:00", "10:00"))
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_filter_and_delete() {
    let f = fixture();
    add_session(&f.pool, &f.batch_id, &f.subject_a, 3, "09:00", "09:50");

    let monday = list_sessions(
        &f.pool.conn,
        &TimetableFilter {
            day_of_week: Some(1),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(monday.len(), 2);

    let all = list_sessions(
        &f.pool.conn,
        &TimetableFilter {
            batch_id: Some(f.batch_id.clone()),
            semester_number: Some(SEMESTER),
            day_of_week: None,
        },
    )
    .unwrap();
    assert_eq!(all.len(), 3);

    let wed = all.iter().find(|s| s.day_of_week == 3).unwrap();
    delete_session(&f.pool.conn, &wed.id).unwrap();
    assert!(matches!(
        delete_session(&f.pool.conn, &wed.id),
        Err(AppError::NotFound(_))
    ));
    assert_eq!(list_sessions(&f.pool.conn, &TimetableFilter::default()).unwrap().len(), 2);
}

#[test]
fn test_subject_of_another_batch_or_semester_rejected() {
    let f = fixture();
    let other_batch = db::batches::insert_batch(&f.pool.conn, "2024-2028").unwrap().id;
    let chemistry = add_subject(&f.pool, &other_batch, "Chemistry");

    let err = insert_session(&f.pool.conn, &slot(&f.batch_id, &chemistry, 1, "14:00", "14:50")).unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m.contains("Chemistry")));

    let later = db::subjects::insert_subject(
        &f.pool.conn,
        &SubjectInput {
            name: "Optics".into(),
            period: None,
            batch_id: f.batch_id.clone(),
            semester_number: SEMESTER + 1,
        },
    )
    .unwrap();
    assert!(insert_session(&f.pool.conn, &slot(&f.batch_id, &later.id, 1, "14:00", "14:50")).is_err());

    // the gate never offers a class the student could not rate
    let sp = f.student().student_profile().unwrap();
    let status = FeedbackGate::new(15).evaluate(&f.pool.conn, Some(&sp), common::monday(14, 10));
    assert!(status.active_subject.is_none());
}
