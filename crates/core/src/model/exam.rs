use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::{ExamId, QuestionId};
use crate::model::question::{Question, QuestionDraft, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamSettingsError {
    #[error("exam duration must be nonzero")]
    ZeroExamDuration,

    #[error("break duration must be nonzero")]
    ZeroBreakDuration,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam paper has no questions")]
    NoQuestions,

    #[error("duplicate question id {id} in exam paper")]
    DuplicateQuestionId { id: QuestionId },

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Settings(#[from] ExamSettingsError),
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Default exam length: one hour.
pub const DEFAULT_EXAM_SECONDS: u32 = 3600;

/// Default mid-exam break length: ninety seconds.
pub const DEFAULT_BREAK_SECONDS: u32 = 90;

/// Per-exam timing and behavior knobs.
///
/// `auto_advance` controls whether recording an answer also moves to the next
/// question. It is a policy flag, not a fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamSettings {
    exam_seconds: u32,
    break_seconds: u32,
    auto_advance: bool,
}

impl ExamSettings {
    /// Build validated settings.
    ///
    /// # Errors
    ///
    /// Returns `ExamSettingsError` when either duration is zero.
    pub fn new(
        exam_seconds: u32,
        break_seconds: u32,
        auto_advance: bool,
    ) -> Result<Self, ExamSettingsError> {
        if exam_seconds == 0 {
            return Err(ExamSettingsError::ZeroExamDuration);
        }
        if break_seconds == 0 {
            return Err(ExamSettingsError::ZeroBreakDuration);
        }

        Ok(Self {
            exam_seconds,
            break_seconds,
            auto_advance,
        })
    }

    /// Enable or disable advancing to the next question after an answer.
    #[must_use]
    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    #[must_use]
    pub fn exam_seconds(&self) -> u32 {
        self.exam_seconds
    }

    #[must_use]
    pub fn break_seconds(&self) -> u32 {
        self.break_seconds
    }

    #[must_use]
    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            exam_seconds: DEFAULT_EXAM_SECONDS,
            break_seconds: DEFAULT_BREAK_SECONDS,
            auto_advance: false,
        }
    }
}

//
// ─── EXAM PAPER ────────────────────────────────────────────────────────────────
//

/// An ordered, fixed question sequence together with its settings.
///
/// The question list never changes after construction; the session treats it
/// as read-only. The list splits at `first_half_len()` into the two halves
/// separated by the break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamPaper {
    id: ExamId,
    title: String,
    description: Option<String>,
    settings: ExamSettings,
    questions: Vec<Question>,
}

impl ExamPaper {
    /// Build a validated exam paper.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NoQuestions` for an empty question list and
    /// `ExamError::DuplicateQuestionId` when two questions share an id.
    pub fn new(
        id: ExamId,
        title: impl Into<String>,
        description: Option<String>,
        settings: ExamSettings,
        questions: Vec<Question>,
    ) -> Result<Self, ExamError> {
        if questions.is_empty() {
            return Err(ExamError::NoQuestions);
        }

        let mut seen = BTreeSet::new();
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(ExamError::DuplicateQuestionId {
                    id: question.id(),
                });
            }
        }

        Ok(Self {
            id,
            title: title.into(),
            description,
            settings,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> ExamId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn settings(&self) -> &ExamSettings {
        &self.settings
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Total number of questions.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Number of questions before the break: the ceiling of half the total.
    #[must_use]
    pub fn first_half_len(&self) -> usize {
        self.questions.len().div_ceil(2)
    }

    /// Whole minutes of exam time, as shown on catalog cards.
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.settings.exam_seconds() / 60
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

fn default_exam_seconds() -> u32 {
    DEFAULT_EXAM_SECONDS
}

fn default_break_seconds() -> u32 {
    DEFAULT_BREAK_SECONDS
}

/// Unvalidated exam paper data as it arrives from a question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperDraft {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_exam_seconds")]
    pub exam_seconds: u32,
    #[serde(default = "default_break_seconds")]
    pub break_seconds: u32,
    #[serde(default)]
    pub auto_advance: bool,
    pub questions: Vec<QuestionDraft>,
}

impl PaperDraft {
    /// Validate the draft into an `ExamPaper`.
    ///
    /// # Errors
    ///
    /// Returns `ExamError` when settings or any question fail validation, or
    /// when the paper itself is malformed.
    pub fn validate(self) -> Result<ExamPaper, ExamError> {
        let settings = ExamSettings::new(self.exam_seconds, self.break_seconds, self.auto_advance)?;
        let questions = self
            .questions
            .into_iter()
            .map(QuestionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;

        ExamPaper::new(
            ExamId::new(self.id),
            self.title,
            self.description,
            settings,
            questions,
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["a".to_string(), "b".to_string()],
            0,
        )
        .unwrap()
    }

    fn build_paper(count: u64) -> ExamPaper {
        let questions = (1..=count).map(build_question).collect();
        ExamPaper::new(
            ExamId::new(1),
            "General Knowledge",
            None,
            ExamSettings::default(),
            questions,
        )
        .unwrap()
    }

    #[test]
    fn settings_defaults_match_one_hour_and_ninety_seconds() {
        let settings = ExamSettings::default();
        assert_eq!(settings.exam_seconds(), 3600);
        assert_eq!(settings.break_seconds(), 90);
        assert!(!settings.auto_advance());
    }

    #[test]
    fn settings_reject_zero_durations() {
        assert!(matches!(
            ExamSettings::new(0, 90, false).unwrap_err(),
            ExamSettingsError::ZeroExamDuration
        ));
        assert!(matches!(
            ExamSettings::new(3600, 0, false).unwrap_err(),
            ExamSettingsError::ZeroBreakDuration
        ));
    }

    #[test]
    fn empty_paper_is_rejected() {
        let err = ExamPaper::new(
            ExamId::new(1),
            "Empty",
            None,
            ExamSettings::default(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ExamError::NoQuestions));
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let err = ExamPaper::new(
            ExamId::new(1),
            "Dup",
            None,
            ExamSettings::default(),
            vec![build_question(3), build_question(3)],
        )
        .unwrap_err();
        assert!(matches!(err, ExamError::DuplicateQuestionId { .. }));
    }

    #[test]
    fn first_half_rounds_up_for_odd_counts() {
        assert_eq!(build_paper(10).first_half_len(), 5);
        assert_eq!(build_paper(5).first_half_len(), 3);
        assert_eq!(build_paper(1).first_half_len(), 1);
    }

    #[test]
    fn duration_minutes_truncates_to_whole_minutes() {
        assert_eq!(build_paper(2).duration_minutes(), 60);
    }

    #[test]
    fn draft_defaults_fill_missing_settings() {
        let draft = PaperDraft {
            id: 1,
            title: "Science Mock Exam".to_string(),
            description: Some("Prepare for your science exam.".to_string()),
            exam_seconds: default_exam_seconds(),
            break_seconds: default_break_seconds(),
            auto_advance: false,
            questions: vec![QuestionDraft {
                id: 1,
                text: "Q".to_string(),
                options: vec!["a".to_string(), "b".to_string()],
                correct_answer: 1,
            }],
        };

        let paper = draft.validate().unwrap();
        assert_eq!(paper.settings().exam_seconds(), 3600);
        assert_eq!(paper.question_count(), 1);
        assert_eq!(paper.description(), Some("Prepare for your science exam."));
    }

    #[test]
    fn draft_propagates_question_errors() {
        let draft = PaperDraft {
            id: 1,
            title: "Broken".to_string(),
            description: None,
            exam_seconds: 60,
            break_seconds: 30,
            auto_advance: false,
            questions: vec![QuestionDraft {
                id: 1,
                text: "Q".to_string(),
                options: vec!["only".to_string()],
                correct_answer: 0,
            }],
        };

        let err = draft.validate().unwrap_err();
        assert!(matches!(err, ExamError::Question(_)));
    }
}
