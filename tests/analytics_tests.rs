mod common;
use common::{Fixture, SEMESTER, add_student, add_subject, fixture, monday};
use feedback_portal::core::analytics::{
    dashboard_stats, daily_trends, subject_analytics, subject_stats,
};
use feedback_portal::db::feedback::{NewFeedback, insert_feedback};

fn rate(f: &Fixture, student: &str, class_id: &str, rating: i64, created_at: &str) {
    insert_feedback(
        &f.pool.conn,
        &NewFeedback {
            student_id: student.to_string(),
            class_id: class_id.to_string(),
            batch_id: f.batch_id.clone(),
            semester_number: SEMESTER,
            rating,
            comment: None,
            additional_feedback: vec![],
            created_at: created_at.to_string(),
        },
    )
    .expect("insert feedback");
}

/// Three students; Mathematics rated 5, 4, 4 and Physics rated 2.
fn rated_fixture() -> (Fixture, Vec<String>) {
    let f = fixture();
    let s2 = add_student(&f.pool, "grace@example.edu", &f.batch_id);
    let s3 = add_student(&f.pool, "alan@example.edu", &f.batch_id);
    let students = vec![f.student_id.clone(), s2, s3];

    rate(&f, &students[0], &f.subject_a, 5, "2025-01-04 09:10:00");
    rate(&f, &students[1], &f.subject_a, 4, "2025-01-06 09:20:00");
    rate(&f, &students[2], &f.subject_a, 4, "2025-01-06 09:40:00");
    rate(&f, &students[0], &f.subject_b, 2, "2025-01-06 10:30:00");
    (f, students)
}

#[test]
fn test_dashboard_counts() {
    let (f, _) = rated_fixture();
    let stats = dashboard_stats(&f.pool.conn, monday(12, 0)).unwrap();
    assert_eq!(stats.student_count, 3);
    assert_eq!(stats.subject_count, 2);
    assert_eq!(stats.total_feedback_count, 4);
    assert_eq!(stats.feedback_today_count, 3);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["totalFeedbackCount"], 4);
}

#[test]
fn test_dashboard_on_empty_db() {
    let f = fixture();
    let stats = dashboard_stats(&f.pool.conn, monday(12, 0)).unwrap();
    assert_eq!(stats.total_feedback_count, 0);
    assert_eq!(stats.feedback_today_count, 0);
}

#[test]
fn test_subject_stats_only_rated_subjects() {
    let (f, _) = rated_fixture();
    add_subject(&f.pool, &f.batch_id, "Biology");

    let stats = subject_stats(&f.pool.conn).unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].subject_name, "Mathematics");
    assert_eq!(stats[0].feedback_count, 3);
    assert_eq!(stats[0].average_rating, 4.33);
    assert_eq!(stats[1].average_rating, 2.0);
}

#[test]
fn test_subject_analytics_distribution() {
    let (f, _) = rated_fixture();
    add_subject(&f.pool, &f.batch_id, "Biology");

    let rows = subject_analytics(&f.pool.conn, Some(&f.batch_id), Some(SEMESTER)).unwrap();
    assert_eq!(rows.len(), 3);

    let bio = rows.iter().find(|r| r.subject_name == "Biology").unwrap();
    assert_eq!(bio.feedback_count, 0);
    assert_eq!(bio.average_rating, None);
    assert_eq!(bio.rating_counts, [0; 5]);

    let math = rows.iter().find(|r| r.subject_name == "Mathematics").unwrap();
    assert_eq!(math.rating_counts, [0, 0, 0, 2, 1]);
    assert_eq!(math.min_rating, Some(4));
    assert_eq!(math.max_rating, Some(5));
    assert_eq!(math.batch_name.as_deref(), Some("2023-2027"));

    assert!(subject_analytics(&f.pool.conn, None, Some(1)).unwrap().is_empty());
}

#[test]
fn test_daily_trends_window() {
    let (f, _) = rated_fixture();

    let trends = daily_trends(&f.pool.conn, monday(12, 0), 30, None, None).unwrap();
    assert_eq!(trends.len(), 2);
    assert_eq!(trends[0].date, "2025-01-04");
    assert_eq!(trends[0].feedback_count, 1);
    assert_eq!(trends[1].date, "2025-01-06");
    assert_eq!(trends[1].feedback_count, 3);
    assert_eq!(trends[1].average_rating, 3.33);

    // today only
    let today = daily_trends(&f.pool.conn, monday(12, 0), 1, None, None).unwrap();
    assert_eq!(today.len(), 1);

    let other = daily_trends(&f.pool.conn, monday(12, 0), 30, Some("missing"), None).unwrap();
    assert!(other.is_empty());
}
