use serde::Serialize;
use thiserror::Error;

use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("answer log length {answers} does not match question count {questions}")]
    AnswerLogMismatch { questions: usize, answers: usize },

    #[error("too many questions for a single report: {len}")]
    TooManyQuestions { len: usize },

    #[error("attempted ({attempted}) plus unattempted ({unattempted}) does not equal total ({total})")]
    AttemptedMismatch {
        total: u32,
        attempted: u32,
        unattempted: u32,
    },

    #[error("correct ({correct}) plus wrong ({wrong}) does not equal attempted ({attempted})")]
    CorrectMismatch {
        attempted: u32,
        correct: u32,
        wrong: u32,
    },
}

//
// ─── ANSWER VERDICT ────────────────────────────────────────────────────────────
//

/// How a single question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnswerVerdict {
    /// The selected option is the correct one.
    Correct,
    /// An option was selected but it is not the correct one.
    Incorrect,
    /// No option was ever selected.
    Skipped,
}

impl AnswerVerdict {
    /// Judge a recorded selection against a question.
    #[must_use]
    pub fn judge(question: &Question, selected: Option<usize>) -> Self {
        match selected {
            Some(option) if option == question.correct_answer() => Self::Correct,
            Some(_) => Self::Incorrect,
            None => Self::Skipped,
        }
    }
}

//
// ─── SCORE REPORT ──────────────────────────────────────────────────────────────
//

/// Final summary of a finished exam attempt.
///
/// A pure function of the answer log and the question set: deriving it twice
/// from the same inputs yields the same report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    total: u32,
    attempted: u32,
    correct: u32,
    wrong: u32,
    unattempted: u32,
    time_spent_seconds: u32,
    score_percent: u32,
}

impl ScoreReport {
    /// Rebuild a report from already-computed counts.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if the counts are internally inconsistent.
    pub fn from_parts(
        total: u32,
        attempted: u32,
        correct: u32,
        wrong: u32,
        unattempted: u32,
        time_spent_seconds: u32,
        score_percent: u32,
    ) -> Result<Self, ReportError> {
        if attempted.saturating_add(unattempted) != total {
            return Err(ReportError::AttemptedMismatch {
                total,
                attempted,
                unattempted,
            });
        }
        if correct.saturating_add(wrong) != attempted {
            return Err(ReportError::CorrectMismatch {
                attempted,
                correct,
                wrong,
            });
        }

        Ok(Self {
            total,
            attempted,
            correct,
            wrong,
            unattempted,
            time_spent_seconds,
            score_percent,
        })
    }

    /// Derive a report from the question set and the answer log.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::AnswerLogMismatch` when the log and question
    /// list differ in length, `ReportError::TooManyQuestions` when the count
    /// cannot fit in `u32`.
    pub fn derive(
        questions: &[Question],
        answers: &[Option<usize>],
        time_spent_seconds: u32,
    ) -> Result<Self, ReportError> {
        if questions.len() != answers.len() {
            return Err(ReportError::AnswerLogMismatch {
                questions: questions.len(),
                answers: answers.len(),
            });
        }
        let total = u32::try_from(questions.len()).map_err(|_| ReportError::TooManyQuestions {
            len: questions.len(),
        })?;

        let mut attempted = 0_u32;
        let mut correct = 0_u32;
        for (question, answer) in questions.iter().zip(answers) {
            if let Some(option) = answer {
                attempted = attempted.saturating_add(1);
                if *option == question.correct_answer() {
                    correct = correct.saturating_add(1);
                }
            }
        }

        let score_percent = if total == 0 {
            0
        } else {
            (f64::from(correct) * 100.0 / f64::from(total)).round() as u32
        };

        Self::from_parts(
            total,
            attempted,
            correct,
            attempted - correct,
            total - attempted,
            time_spent_seconds,
            score_percent,
        )
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    #[must_use]
    pub fn unattempted(&self) -> u32 {
        self.unattempted
    }

    /// Exam seconds consumed before finishing. Break time is excluded because
    /// the exam clock is frozen while the break runs.
    #[must_use]
    pub fn time_spent_seconds(&self) -> u32 {
        self.time_spent_seconds
    }

    /// Correct answers over total questions, rounded to the nearest percent.
    #[must_use]
    pub fn score_percent(&self) -> u32 {
        self.score_percent
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
