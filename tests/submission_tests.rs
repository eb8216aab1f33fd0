use feedback_portal::core::submission::{FeedbackSubmission, SubmissionPolicy, submit_feedback};
use feedback_portal::db;
use feedback_portal::db::feedback::NewFeedback;
use feedback_portal::errors::AppError;
use feedback_portal::models::feedback::AnswerInput;
use feedback_portal::models::question::QuestionInput;
use feedback_portal::models::{Answer, QuestionKind};
use chrono::NaiveDateTime;

mod common;
use common::{Fixture, SEMESTER, fixture, monday};

fn body(class_id: &str, rating: i64) -> FeedbackSubmission {
    FeedbackSubmission {
        class_id: class_id.to_string(),
        batch_id: None,
        semester_number: None,
        rating,
        comment: Some("Clear explanations".into()),
        additional_feedback: vec![],
    }
}

fn policy(now: NaiveDateTime) -> SubmissionPolicy {
    SubmissionPolicy {
        now,
        grace_minutes: 15,
        enforce_window: true,
    }
}

fn submit(f: &Fixture, sub: &FeedbackSubmission, now: NaiveDateTime) -> Result<(), AppError> {
    submit_feedback(&f.pool.conn, &f.student(), sub, policy(now)).map(|_| ())
}

#[test]
fn test_submission_inside_window_is_stored() {
    let f = fixture();
    let record = submit_feedback(&f.pool.conn, &f.student(), &body(&f.subject_a, 5), policy(monday(9, 40)))
        .expect("accepted");

    assert_eq!(record.rating, 5);
    assert_eq!(record.class_id, f.subject_a);
    assert_eq!(record.batch_id.as_deref(), Some(f.batch_id.as_str()));
    assert_eq!(record.semester_number, Some(SEMESTER));
    assert_eq!(record.subject_name.as_deref(), Some("Mathematics"));
    assert_eq!(record.created_at, "2025-01-06 09:40:00");
    assert!(!record.is_response_seen_by_student);
    assert_eq!(f.feedback_count(), 1);
}

#[test]
fn test_rating_out_of_range_is_rejected() {
    let f = fixture();

    for rating in [0, 6, -1] {
        let err = submit(&f, &body(&f.subject_a, rating), monday(9, 10)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "rating {rating}: {err:?}");
    }
    assert_eq!(f.feedback_count(), 0);
}

#[test]
fn test_second_submission_is_a_duplicate() {
    let f = fixture();
    submit(&f, &body(&f.subject_a, 4), monday(9, 10)).expect("first accepted");

    let err = submit(&f, &body(&f.subject_a, 2), monday(9, 20)).unwrap_err();
    assert!(matches!(err, AppError::DuplicateSubmission));
    assert_eq!(f.feedback_count(), 1);
}

#[test]
fn test_unique_constraint_maps_to_duplicate() {
    let f = fixture();
    let row = NewFeedback {
        student_id: f.student_id.clone(),
        class_id: f.subject_a.clone(),
        batch_id: f.batch_id.clone(),
        semester_number: SEMESTER,
        rating: 3,
        comment: None,
        additional_feedback: vec![],
        created_at: "2025-01-06 09:10:00".into(),
    };

    db::feedback::insert_feedback(&f.pool.conn, &row).expect("first insert");
    let err = db::feedback::insert_feedback(&f.pool.conn, &row).unwrap_err();

    assert!(matches!(err, AppError::DuplicateSubmission));
    assert_eq!(f.feedback_count(), 1);
}

#[test]
fn test_submission_outside_window_is_refused() {
    let f = fixture();

    // Mathematics closed at 10:05, Physics has not started at 09:30
    let err = submit(&f, &body(&f.subject_a, 4), monday(10, 6)).unwrap_err();
    assert!(matches!(err, AppError::WindowClosed(_)));

    let err = submit(&f, &body(&f.subject_b, 4), monday(9, 30)).unwrap_err();
    assert!(matches!(err, AppError::WindowClosed(_)));

    assert_eq!(f.feedback_count(), 0);
}

#[test]
fn test_only_the_active_class_accepts_feedback() {
    let f = fixture();

    // 10:03: Physics has started but Mathematics is still in its grace period
    let err = submit(&f, &body(&f.subject_b, 4), monday(10, 3)).unwrap_err();
    assert!(matches!(err, AppError::WindowClosed(_)));
    submit(&f, &body(&f.subject_a, 4), monday(10, 3)).expect("Mathematics accepted");

    // once Mathematics' grace is over, Physics takes over
    submit(&f, &body(&f.subject_b, 5), monday(10, 6)).expect("Physics accepted");
    assert_eq!(f.feedback_count(), 2);
}

#[test]
fn test_window_not_enforced_when_disabled() {
    let f = fixture();
    let relaxed = SubmissionPolicy {
        enforce_window: false,
        ..policy(monday(18, 0))
    };

    submit_feedback(&f.pool.conn, &f.student(), &body(&f.subject_b, 3), relaxed).expect("accepted");
    assert_eq!(f.feedback_count(), 1);
}

#[test]
fn test_mismatched_batch_or_semester_is_rejected() {
    let f = fixture();

    let mut sub = body(&f.subject_a, 4);
    sub.semester_number = Some(SEMESTER + 1);
    let err = submit(&f, &sub, monday(9, 10)).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut sub = body(&f.subject_a, 4);
    sub.batch_id = Some("another-batch".into());
    let err = submit(&f, &sub, monday(9, 10)).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(f.feedback_count(), 0);
}

#[test]
fn test_unknown_subject_is_not_found() {
    let f = fixture();
    let err = submit(&f, &body("no-such-subject", 4), monday(9, 10)).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_long_comment_is_rejected() {
    let f = fixture();
    let mut sub = body(&f.subject_a, 4);
    sub.comment = Some("x".repeat(501));

    let err = submit(&f, &sub, monday(9, 10)).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(f.feedback_count(), 0);
}

#[test]
fn test_blank_comment_is_stored_as_none() {
    let f = fixture();
    let mut sub = body(&f.subject_a, 4);
    sub.comment = Some("   ".into());

    let record = submit_feedback(&f.pool.conn, &f.student(), &sub, policy(monday(9, 10))).unwrap();
    assert_eq!(record.comment, None);
}

#[test]
fn test_questions_must_be_answered() {
    let f = fixture();
    let q = feedback_portal::core::questions::create_question(
        &f.pool.conn,
        &QuestionInput {
            question_text: "Was the pace right?".into(),
            kind: QuestionKind::MultipleChoice {
                options: vec!["Too slow".into(), "Just right".into(), "Too fast".into()],
            },
            batch_id: f.batch_id.clone(),
            semester_number: SEMESTER,
        },
    )
    .unwrap();

    let err = submit(&f, &body(&f.subject_a, 4), monday(9, 10)).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(f.feedback_count(), 0);

    let mut sub = body(&f.subject_a, 4);
    sub.additional_feedback = vec![AnswerInput {
        question_id: q.id.clone(),
        answer: Answer::One("Just right".into()),
    }];
    let record = submit_feedback(&f.pool.conn, &f.student(), &sub, policy(monday(9, 10))).unwrap();

    assert_eq!(record.additional_feedback.len(), 1);
    assert_eq!(record.additional_feedback[0].question_text, "Was the pace right?");
    assert_eq!(record.additional_feedback[0].answer, Answer::One("Just right".into()));
}

#[test]
fn test_admin_cannot_submit() {
    let f = fixture();
    let mut admin = f.student();
    admin.is_admin = true;

    let err = submit_feedback(&f.pool.conn, &admin, &body(&f.subject_a, 4), policy(monday(9, 10)))
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[test]
fn test_submission_is_audited() {
    let f = fixture();
    submit(&f, &body(&f.subject_a, 4), monday(9, 10)).unwrap();

    let log = db::log::load_log(&f.pool.conn, None).unwrap();
    assert!(log.iter().any(|e| e.operation == "feedback" && e.message.contains("Mathematics")));
}
