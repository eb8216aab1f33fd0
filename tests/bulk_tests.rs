use feedback_portal::core::auth::{create_student, verify_password};
use feedback_portal::core::bulk::{self, MAX_BULK_ROWS};
use feedback_portal::db;
use feedback_portal::errors::AppError;
use feedback_portal::models::profile::StudentInput;
use feedback_portal::models::subject::SubjectInput;

mod common;
use common::{SEMESTER, fixture};

fn student(email: &str, batch_id: &str) -> StudentInput {
    StudentInput {
        email: email.to_string(),
        password: "s3cret-pass".into(),
        first_name: "Row".into(),
        last_name: "Student".into(),
        batch_id: batch_id.to_string(),
        semester_number: SEMESTER,
    }
}

#[test]
fn test_failed_row_does_not_stop_the_rest() {
    let f = fixture();
    let conn = &f.pool.conn;

    let mut bad_semester = student("late@example.edu", &f.batch_id);
    bad_semester.semester_number = 9;
    let rows = vec![
        student("first@example.edu", &f.batch_id),
        bad_semester,
        student("FIRST@example.edu", &f.batch_id),
        student("last@example.edu", &f.batch_id),
    ];

    let report = bulk::create_each(
        rows,
        |s| s.email.clone(),
        |s| create_student(conn, &s),
        |p| p.id.clone(),
    );

    assert_eq!(report.summary(), "2 created, 2 failed");
    assert_eq!(report.success[1].item, "last@example.edu");
    assert_eq!(report.success[1].row, 4);
    assert_eq!(report.failed[0].error, "Semester must be between 1 and 8");
    assert_eq!(report.failed[1].error, "A user with this email already exists");

    let (_, hash) = db::users::find_credentials(conn, "last@example.edu")
        .unwrap()
        .unwrap();
    assert!(verify_password("s3cret-pass", &hash));
}

#[test]
fn test_subject_rows_and_audit_line() {
    let f = fixture();
    let conn = &f.pool.conn;

    let rows = vec![
        SubjectInput {
            name: "Chemistry".into(),
            period: None,
            batch_id: f.batch_id.clone(),
            semester_number: SEMESTER,
        },
        SubjectInput {
            name: "Biology".into(),
            period: Some(0),
            batch_id: f.batch_id.clone(),
            semester_number: SEMESTER,
        },
    ];
    let report = bulk::create_each(
        rows,
        |s| s.name.clone(),
        |s| db::subjects::insert_subject(conn, &s),
        |s| s.id.clone(),
    );
    bulk::audit(conn, "subjects:bulk", &report);

    assert_eq!(report.success.len(), 1);
    assert_eq!(report.failed[0].item, "Biology");

    let log = db::log::load_log(conn, None).unwrap();
    assert!(
        log.iter()
            .any(|l| l.target == "subjects:bulk" && l.message == "1 created, 1 failed")
    );
}

#[test]
fn test_check_rows_limits() {
    let empty: Vec<u8> = vec![];
    assert!(matches!(bulk::check_rows(&empty, "subjects"), Err(AppError::Validation(m)) if m == "No subjects provided"));
    assert!(bulk::check_rows(&vec![0u8; MAX_BULK_ROWS], "subjects").is_ok());
    assert!(bulk::check_rows(&vec![0u8; MAX_BULK_ROWS + 1], "subjects").is_err());
}
