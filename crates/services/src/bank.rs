//! Loading exam material from a JSON question bank.
//!
//! The bank is an external collaborator: it supplies ordered question data
//! once, before a session starts. Everything that comes in goes through the
//! draft types' validation before the core ever sees it.

use exam_core::model::{ExamPaper, PaperDraft, Question, QuestionDraft};

use crate::error::BankError;

/// Parse a JSON array of questions into validated `Question`s, preserving
/// their order.
///
/// # Errors
///
/// Returns `BankError::Parse` for malformed JSON and `BankError::Question`
/// when a record fails validation.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, BankError> {
    let drafts: Vec<QuestionDraft> = serde_json::from_str(json)?;
    drafts
        .into_iter()
        .map(|draft| draft.validate().map_err(BankError::from))
        .collect()
}

/// Parse one JSON exam paper, questions included.
///
/// # Errors
///
/// Returns `BankError::Parse` for malformed JSON and `BankError::Exam` when
/// the paper or any of its questions fail validation.
pub fn parse_paper(json: &str) -> Result<ExamPaper, BankError> {
    let draft: PaperDraft = serde_json::from_str(json)?;
    Ok(draft.validate()?)
}

/// Parse a JSON array of exam papers, e.g. a whole catalog file.
///
/// # Errors
///
/// Returns `BankError::Parse` for malformed JSON and `BankError::Exam` when
/// any paper fails validation.
pub fn parse_papers(json: &str) -> Result<Vec<ExamPaper>, BankError> {
    let drafts: Vec<PaperDraft> = serde_json::from_str(json)?;
    drafts
        .into_iter()
        .map(|draft| draft.validate().map_err(BankError::from))
        .collect()
}
