//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{ExamError, ExamId, QuestionError};

/// Errors emitted by `ExamCatalog`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("no exam with id {0}")]
    UnknownExam(ExamId),
    #[error("duplicate exam id {0} in catalog")]
    DuplicateExam(ExamId),
}

/// Errors emitted while loading exam material from a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Exam(#[from] ExamError),
}
