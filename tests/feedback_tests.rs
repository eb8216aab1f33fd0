mod common;
use common::{SEMESTER, add_student, fixture};
use feedback_portal::db::feedback::{
    NewFeedback, history_page, insert_feedback, mark_seen, respond, unseen_responses,
};
use feedback_portal::errors::AppError;

fn new_feedback(student: &str, class_id: &str, batch_id: &str, at: &str) -> NewFeedback {
    NewFeedback {
        student_id: student.to_string(),
        class_id: class_id.to_string(),
        batch_id: batch_id.to_string(),
        semester_number: SEMESTER,
        rating: 4,
        comment: Some("Clear explanations".into()),
        additional_feedback: vec![],
        created_at: at.to_string(),
    }
}

#[test]
fn test_response_notifies_student_until_seen() {
    let f = fixture();
    let conn = &f.pool.conn;
    let fb = insert_feedback(conn, &new_feedback(&f.student_id, &f.subject_a, &f.batch_id, "2025-01-06 09:20:00")).unwrap();
    assert!(unseen_responses(conn, &f.student_id).unwrap().is_empty());

    let answered = respond(conn, &fb.id, Some("  Thanks, noted. "), None).unwrap();
    assert_eq!(answered.admin_response.as_deref(), Some("Thanks, noted."));
    assert!(!answered.is_response_seen_by_student);
    assert_eq!(unseen_responses(conn, &f.student_id).unwrap().len(), 1);

    let seen = mark_seen(conn, &fb.id, &f.student_id).unwrap();
    assert!(seen.is_response_seen_by_student);
    assert!(unseen_responses(conn, &f.student_id).unwrap().is_empty());

    // a changed response raises the notification again
    respond(conn, &fb.id, Some("Follow-up: slides uploaded"), None).unwrap();
    assert_eq!(unseen_responses(conn, &f.student_id).unwrap().len(), 1);

    // same text again leaves the flag alone
    mark_seen(conn, &fb.id, &f.student_id).unwrap();
    let same = respond(conn, &fb.id, Some("Follow-up: slides uploaded"), None).unwrap();
    assert!(same.is_response_seen_by_student);
}

#[test]
fn test_only_owner_marks_seen() {
    let f = fixture();
    let conn = &f.pool.conn;
    let other = add_student(&f.pool, "grace@example.edu", &f.batch_id);
    let fb = insert_feedback(conn, &new_feedback(&f.student_id, &f.subject_a, &f.batch_id, "2025-01-06 09:20:00")).unwrap();

    assert!(matches!(mark_seen(conn, &fb.id, &other), Err(AppError::Forbidden(_))));
    assert!(matches!(mark_seen(conn, "missing", &other), Err(AppError::NotFound(_))));
    assert!(matches!(respond(conn, "missing", Some("x"), None), Err(AppError::NotFound(_))));
}

#[test]
fn test_history_pages_newest_first() {
    let f = fixture();
    let conn = &f.pool.conn;
    insert_feedback(conn, &new_feedback(&f.student_id, &f.subject_a, &f.batch_id, "2025-01-06 09:20:00")).unwrap();
    insert_feedback(conn, &new_feedback(&f.student_id, &f.subject_b, &f.batch_id, "2025-01-06 10:20:00")).unwrap();

    let (first, total) = history_page(conn, &f.student_id, 1, 1).unwrap();
    assert_eq!(total, 2);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].subject_name.as_deref(), Some("Physics"));

    let (second, _) = history_page(conn, &f.student_id, 2, 1).unwrap();
    assert_eq!(second[0].subject_name.as_deref(), Some("Mathematics"));

    let (past_end, _) = history_page(conn, &f.student_id, 3, 1).unwrap();
    assert!(past_end.is_empty());
}
