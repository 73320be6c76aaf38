use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use exam_core::model::{AnswerVerdict, AttemptId, QuestionId, ScoreReport};
use exam_core::session::{ExamSession, FinishReason, QuestionStatus, SessionPhase};

use super::progress::SessionProgress;

/// What the presentation layer may know about the question under the cursor.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no styling decisions
///
/// The correct answer is withheld; once the attempt finishes, the answer
/// review items carry it instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub index: usize,
    pub text: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub bookmarked: bool,
}

impl QuestionView {
    #[must_use]
    pub fn of(session: &ExamSession) -> Self {
        let index = session.cursor();
        let question = session.current_question();
        Self {
            id: question.id(),
            index,
            text: question.text().to_string(),
            options: question.options().to_vec(),
            selected: session.answers()[index],
            bookmarked: session.bookmarks().contains(&index),
        }
    }
}

/// Read-only projection of the whole session, rebuilt after every mutation.
///
/// Whether the clocks are shown is a presentation concern; the values here
/// keep counting regardless.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub attempt_id: AttemptId,
    pub phase: SessionPhase,
    pub cursor: usize,
    pub current_question: QuestionView,
    pub answers: Vec<Option<usize>>,
    pub bookmarks: BTreeSet<usize>,
    pub statuses: Vec<QuestionStatus>,
    pub exam_seconds_left: u32,
    pub break_seconds_left: u32,
    pub is_first_half: bool,
    pub break_taken: bool,
    pub review_open: bool,
    /// Question count for the "Question x of y" footer: the first half while
    /// the cursor sits there, the whole paper otherwise.
    pub visible_question_total: usize,
    pub progress: SessionProgress,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub finish_reason: Option<FinishReason>,
    pub report: Option<ScoreReport>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn of(session: &ExamSession) -> Self {
        let paper = session.paper();
        let statuses = (0..paper.question_count())
            .filter_map(|index| session.question_status(index))
            .collect();
        let visible_question_total = if session.is_first_half() {
            paper.first_half_len()
        } else {
            paper.question_count()
        };

        Self {
            attempt_id: session.attempt_id(),
            phase: session.phase(),
            cursor: session.cursor(),
            current_question: QuestionView::of(session),
            answers: session.answers().to_vec(),
            bookmarks: session.bookmarks().clone(),
            statuses,
            exam_seconds_left: session.exam_seconds_left(),
            break_seconds_left: session.break_seconds_left(),
            is_first_half: session.is_first_half(),
            break_taken: session.break_taken(),
            review_open: session.is_review_open(),
            visible_question_total,
            progress: SessionProgress::of(session),
            started_at: session.started_at(),
            finished_at: session.finished_at(),
            finish_reason: session.finish_reason(),
            report: session.report().cloned(),
        }
    }
}

/// One row of the post-exam answer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerReviewItem {
    pub index: usize,
    pub question: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub correct_answer: usize,
    pub verdict: AnswerVerdict,
}

impl AnswerReviewItem {
    /// Build the full review list for a finished attempt. Empty before the
    /// attempt finishes: correct answers stay hidden while clocks can still
    /// run.
    #[must_use]
    pub fn list_for(session: &ExamSession) -> Vec<Self> {
        if session.phase() != SessionPhase::Finished {
            return Vec::new();
        }

        session
            .paper()
            .questions()
            .iter()
            .zip(session.answers())
            .enumerate()
            .map(|(index, (question, selected))| Self {
                index,
                question: question.text().to_string(),
                options: question.options().to_vec(),
                selected: *selected,
                correct_answer: question.correct_answer(),
                verdict: AnswerVerdict::judge(question, *selected),
            })
            .collect()
    }
}
