use crate::db;
use crate::errors::{AppError, AppResult};
use crate::models::feedback::AnswerInput;
use crate::models::question::QuestionInput;
use crate::models::{Answer, AnsweredQuestion, FeedbackQuestion, QuestionKind};
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};

pub const MAX_QUESTION_LEN: usize = 500;
pub const MAX_ANSWER_LEN: usize = 500;

/// Check a question and return it with text and options trimmed.
pub fn validate_question(input: &QuestionInput) -> AppResult<QuestionInput> {
    let text = input.question_text.trim();
    if text.is_empty() {
        return Err(AppError::validation("Question text is required"));
    }
    if text.chars().count() > MAX_QUESTION_LEN {
        return Err(AppError::Validation(format!(
            "Question text must be at most {MAX_QUESTION_LEN} characters"
        )));
    }
    if input.batch_id.trim().is_empty() {
        return Err(AppError::validation("Batch is required"));
    }
    if !(1..=8).contains(&input.semester_number) {
        return Err(AppError::validation("Semester must be between 1 and 8"));
    }

    let kind = match &input.kind {
        QuestionKind::FreeText => QuestionKind::FreeText,
        QuestionKind::MultipleChoice { options } => {
            let options: Vec<String> = options.iter().map(|o| o.trim().to_string()).collect();
            if options.len() < 2 {
                return Err(AppError::validation(
                    "Multiple choice questions need at least 2 options",
                ));
            }
            if options.iter().any(String::is_empty) {
                return Err(AppError::validation("Options cannot be empty"));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = options.iter().find(|o| !seen.insert(o.as_str())) {
                return Err(AppError::Validation(format!("Duplicate option: {dup}")));
            }
            QuestionKind::MultipleChoice { options }
        }
    };

    Ok(QuestionInput {
        question_text: text.to_string(),
        kind,
        batch_id: input.batch_id.trim().to_string(),
        semester_number: input.semester_number,
    })
}

fn ensure_batch(conn: &Connection, batch_id: &str) -> AppResult<()> {
    if db::batches::get_batch(conn, batch_id)?.is_none() {
        return Err(AppError::NotFound("Batch".into()));
    }
    Ok(())
}

pub fn create_question(conn: &Connection, input: &QuestionInput) -> AppResult<FeedbackQuestion> {
    let input = validate_question(input)?;
    ensure_batch(conn, &input.batch_id)?;
    db::questions::insert_question(conn, &input)
}

pub fn update_question(
    conn: &Connection,
    id: &str,
    input: &QuestionInput,
) -> AppResult<FeedbackQuestion> {
    let input = validate_question(input)?;
    ensure_batch(conn, &input.batch_id)?;
    db::questions::update_question(conn, id, &input)
}

fn check_text(question: &FeedbackQuestion, answer: &Answer) -> AppResult<Answer> {
    let Answer::One(text) = answer else {
        return Err(AppError::Validation(format!(
            "\"{}\" expects a text answer",
            question.question_text
        )));
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(format!(
            "Please answer: {}",
            question.question_text
        )));
    }
    if text.chars().count() > MAX_ANSWER_LEN {
        return Err(AppError::Validation(format!(
            "Answer to \"{}\" must be at most {MAX_ANSWER_LEN} characters",
            question.question_text
        )));
    }
    Ok(Answer::One(text.to_string()))
}

fn check_choice(question: &FeedbackQuestion, options: &[String], answer: &Answer) -> AppResult<Answer> {
    let invalid = |choice: &str| {
        AppError::Validation(format!(
            "\"{choice}\" is not an option of \"{}\"",
            question.question_text
        ))
    };

    match answer {
        Answer::One(choice) => {
            if !options.iter().any(|o| o == choice) {
                return Err(invalid(choice));
            }
            Ok(answer.clone())
        }
        Answer::Many(choices) => {
            if choices.is_empty() {
                return Err(AppError::Validation(format!(
                    "Please answer: {}",
                    question.question_text
                )));
            }
            let mut seen = HashSet::new();
            for c in choices {
                if !options.iter().any(|o| o == c) {
                    return Err(invalid(c));
                }
                if !seen.insert(c.as_str()) {
                    return Err(AppError::Validation(format!("Option \"{c}\" selected twice")));
                }
            }
            Ok(answer.clone())
        }
    }
}

/// Match answers against the questions that apply to the student.
///
/// Every question must be answered exactly once; the result follows the
/// question order and snapshots each question's text.
pub fn validate_answers(
    questions: &[FeedbackQuestion],
    answers: &[AnswerInput],
) -> AppResult<Vec<AnsweredQuestion>> {
    let by_id: HashMap<&str, &FeedbackQuestion> =
        questions.iter().map(|q| (q.id.as_str(), q)).collect();

    let mut given: HashMap<&str, &Answer> = HashMap::new();
    for a in answers {
        if !by_id.contains_key(a.question_id.as_str()) {
            return Err(AppError::Validation(format!(
                "Unknown question: {}",
                a.question_id
            )));
        }
        if given.insert(a.question_id.as_str(), &a.answer).is_some() {
            return Err(AppError::Validation(format!(
                "Question answered more than once: {}",
                a.question_id
            )));
        }
    }

    let mut out = Vec::with_capacity(questions.len());
    for q in questions {
        let answer = given.get(q.id.as_str()).ok_or_else(|| {
            AppError::Validation(format!("Please answer: {}", q.question_text))
        })?;

        let answer = match &q.kind {
            QuestionKind::FreeText => check_text(q, answer)?,
            QuestionKind::MultipleChoice { options } => check_choice(q, options, answer)?,
        };

        out.push(AnsweredQuestion {
            question_id: q.id.clone(),
            question_text: q.question_text.clone(),
            answer,
        });
    }
    Ok(out)
}
