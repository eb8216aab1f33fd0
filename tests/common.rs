#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use feedback_portal::db;
use feedback_portal::db::initialize::init_db;
use feedback_portal::db::pool::DbPool;
use feedback_portal::db::users::NewUser;
use feedback_portal::models::subject::SubjectInput;
use feedback_portal::models::timetable::TimetableInput;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const SEMESTER: i64 = 3;

pub fn fp() -> Command {
    cargo_bin_cmd!("feedback-portal")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_feedback_portal.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// 2025-01-06 is a Monday.
pub fn monday(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

/// In-memory database with the schema applied.
pub fn memory_db() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init db");
    pool
}

/// One batch, one enrolled student and a Monday with two classes:
/// A (Mathematics) 09:00-09:50 and B (Physics) 10:00-10:50.
pub struct Fixture {
    pub pool: DbPool,
    pub batch_id: String,
    pub subject_a: String,
    pub subject_b: String,
    pub student_id: String,
}

pub fn add_subject(pool: &DbPool, batch_id: &str, name: &str) -> String {
    db::subjects::insert_subject(
        &pool.conn,
        &SubjectInput {
            name: name.to_string(),
            period: None,
            batch_id: batch_id.to_string(),
            semester_number: SEMESTER,
        },
    )
    .expect("insert subject")
    .id
}

pub fn add_session(pool: &DbPool, batch_id: &str, class_id: &str, day: u8, start: &str, end: &str) -> String {
    db::timetables::insert_session(
        &pool.conn,
        &TimetableInput {
            day_of_week: day,
            class_id: class_id.to_string(),
            batch_id: batch_id.to_string(),
            semester_number: SEMESTER,
            start_time: start.to_string(),
            end_time: end.to_string(),
        },
    )
    .expect("insert session")
    .id
}

/// Student row without a real password hash (login is not exercised).
pub fn add_student(pool: &DbPool, email: &str, batch_id: &str) -> String {
    db::users::insert_user(
        &pool.conn,
        &NewUser {
            email: email.to_string(),
            password_hash: "unused".to_string(),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            is_admin: false,
            batch_id: Some(batch_id.to_string()),
            semester_number: Some(SEMESTER),
        },
    )
    .expect("insert student")
}

pub fn fixture() -> Fixture {
    let pool = memory_db();
    let batch_id = db::batches::insert_batch(&pool.conn, "2023-2027")
        .expect("insert batch")
        .id;

    let subject_a = add_subject(&pool, &batch_id, "Mathematics");
    let subject_b = add_subject(&pool, &batch_id, "Physics");
    add_session(&pool, &batch_id, &subject_a, 1, "09:00", "09:50");
    add_session(&pool, &batch_id, &subject_b, 1, "10:00", "10:50");

    let student_id = add_student(&pool, "ada@example.edu", &batch_id);

    Fixture {
        pool,
        batch_id,
        subject_a,
        subject_b,
        student_id,
    }
}

impl Fixture {
    pub fn student(&self) -> feedback_portal::models::Profile {
        db::users::load_profile(&self.pool.conn, &self.student_id)
            .expect("load profile")
            .expect("student exists")
    }

    pub fn feedback_count(&self) -> i64 {
        db::feedback::count_all(&self.pool.conn).expect("count feedback")
    }
}
