use feedback_portal::core::questions::{validate_answers, validate_question};
use feedback_portal::errors::AppError;
use feedback_portal::models::feedback::AnswerInput;
use feedback_portal::models::question::QuestionInput;
use feedback_portal::models::{Answer, FeedbackQuestion, QuestionKind};

fn input(text: &str, kind: QuestionKind) -> QuestionInput {
    QuestionInput {
        question_text: text.to_string(),
        kind,
        batch_id: "batch-1".into(),
        semester_number: 2,
    }
}

fn choice(options: &[&str]) -> QuestionKind {
    QuestionKind::MultipleChoice {
        options: options.iter().map(|o| o.to_string()).collect(),
    }
}

fn question(id: &str, text: &str, kind: QuestionKind) -> FeedbackQuestion {
    FeedbackQuestion {
        id: id.to_string(),
        question_text: text.to_string(),
        kind,
        batch_id: Some("batch-1".into()),
        semester_number: Some(2),
        created_at: "2025-01-01 00:00:00".into(),
        batch_name: None,
    }
}

fn answer(id: &str, a: Answer) -> AnswerInput {
    AnswerInput {
        question_id: id.to_string(),
        answer: a,
    }
}

#[test]
fn test_question_text_rules() {
    assert!(validate_question(&input("How was the lab?", QuestionKind::FreeText)).is_ok());
    assert!(matches!(
        validate_question(&input("   ", QuestionKind::FreeText)),
        Err(AppError::Validation(_))
    ));
    assert!(validate_question(&input(&"q".repeat(500), QuestionKind::FreeText)).is_ok());
    assert!(validate_question(&input(&"q".repeat(501), QuestionKind::FreeText)).is_err());
}

#[test]
fn test_question_semester_range() {
    let mut q = input("Pace?", QuestionKind::FreeText);
    q.semester_number = 9;
    assert!(validate_question(&q).is_err());
    q.semester_number = 0;
    assert!(validate_question(&q).is_err());
}

#[test]
fn test_multiple_choice_options_rules() {
    assert!(validate_question(&input("Pace?", choice(&["Slow"]))).is_err());
    assert!(validate_question(&input("Pace?", choice(&["Slow", " "]))).is_err());
    assert!(validate_question(&input("Pace?", choice(&["Slow", "Slow "]))).is_err());

    let ok = validate_question(&input(" Pace? ", choice(&[" Slow", "Fast "]))).unwrap();
    assert_eq!(ok.question_text, "Pace?");
    assert_eq!(ok.kind, choice(&["Slow", "Fast"]));
}

#[test]
fn test_question_kind_json_shape() {
    let raw = r#"{"question_text":"Pace?","question_type":"multiple_choice","options":["Slow","Fast"],"batch_id":"b","semester_number":1}"#;
    let parsed: QuestionInput = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.kind, choice(&["Slow", "Fast"]));

    let raw = r#"{"question_text":"Anything else?","question_type":"text","batch_id":"b","semester_number":1}"#;
    let parsed: QuestionInput = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.kind, QuestionKind::FreeText);
}

#[test]
fn test_answers_follow_question_order_and_snapshot_text() {
    let qs = vec![
        question("q1", "Pace?", choice(&["Slow", "Fast"])),
        question("q2", "Comments on the lab?", QuestionKind::FreeText),
    ];
    let answers = vec![
        answer("q2", Answer::One("  Great  ".into())),
        answer("q1", Answer::One("Fast".into())),
    ];

    let out = validate_answers(&qs, &answers).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].question_id, "q1");
    assert_eq!(out[0].question_text, "Pace?");
    assert_eq!(out[1].answer, Answer::One("Great".into()));
}

#[test]
fn test_answers_rejections() {
    let qs = vec![
        question("q1", "Topics covered?", choice(&["A", "B", "C"])),
        question("q2", "Lab?", QuestionKind::FreeText),
    ];
    let text_ok = answer("q2", Answer::One("fine".into()));

    // missing answer
    assert!(validate_answers(&qs, &[text_ok.clone()]).is_err());
    // unknown question
    assert!(
        validate_answers(
            &qs,
            &[answer("q1", Answer::One("A".into())), text_ok.clone(), answer("zz", Answer::One("x".into()))]
        )
        .is_err()
    );
    // answered twice
    assert!(
        validate_answers(
            &qs,
            &[answer("q1", Answer::One("A".into())), answer("q1", Answer::One("B".into())), text_ok.clone()]
        )
        .is_err()
    );
    // not an option
    assert!(validate_answers(&qs, &[answer("q1", Answer::One("D".into())), text_ok.clone()]).is_err());
    // repeated choice
    assert!(
        validate_answers(
            &qs,
            &[answer("q1", Answer::Many(vec!["A".into(), "A".into()])), text_ok.clone()]
        )
        .is_err()
    );
    // empty selection
    assert!(validate_answers(&qs, &[answer("q1", Answer::Many(vec![])), text_ok.clone()]).is_err());
    // blank or oversized text
    let a = answer("q1", Answer::One("A".into()));
    assert!(validate_answers(&qs, &[a.clone(), answer("q2", Answer::One(" ".into()))]).is_err());
    assert!(validate_answers(&qs, &[a.clone(), answer("q2", Answer::One("x".repeat(501)))]).is_err());
    // list for a text question
    assert!(validate_answers(&qs, &[a, answer("q2", Answer::Many(vec!["x".into()]))]).is_err());
}

#[test]
fn test_multi_select_answer_accepted() {
    let qs = vec![question("q1", "Topics covered?", choice(&["A", "B", "C"]))];
    let out = validate_answers(&qs, &[answer("q1", Answer::Many(vec!["A".into(), "C".into()]))]).unwrap();
    assert_eq!(out[0].answer, Answer::Many(vec!["A".into(), "C".into()]));
}

#[test]
fn test_no_questions_no_answers() {
    assert!(validate_answers(&[], &[]).unwrap().is_empty());
}
