//! The exam session state machine.
//!
//! One `ExamSession` owns everything a running attempt needs: the phase, the
//! cursor, the answer log, the bookmark set, and both countdown clocks. All
//! mutation goes through named operations that either apply fully or reject
//! with a `SessionError`, leaving state untouched. The session consumes tick
//! events; it does not keep time itself.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::model::{AttemptId, ExamPaper, Question, ReportError, ScoreReport};
use crate::time::Clock;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Rejections produced by session operations.
///
/// Every variant is locally recoverable: the session is unchanged and the
/// caller may treat the rejection as a no-op.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("terms must be accepted before the exam can start")]
    TermsNotAccepted,

    #[error("option {option} is out of range for the current question")]
    OutOfRangeSelection { option: usize },

    #[error("no question at index {index}")]
    UnknownQuestion { index: usize },

    #[error("question {index} is locked until the break is resolved")]
    LockedNavigation { index: usize },

    #[error("no clock is live in the {phase:?} phase")]
    StaleTick { phase: SessionPhase },

    #[error("phase transition was already taken")]
    DoubleTransition,

    #[error("intent is not available in the {phase:?} phase")]
    Unavailable { phase: SessionPhase },

    #[error(transparent)]
    Report(#[from] ReportError),
}

//
// ─── PHASES & STATUSES ─────────────────────────────────────────────────────────
//

/// Macro-state of an exam attempt. Exactly one is active at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Guidelines,
    InProgress,
    OnBreak,
    Finished,
}

/// Why a session reached `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FinishReason {
    /// The user submitted from the last question.
    Submitted,
    /// The exam clock ran out.
    TimeExpired,
}

/// Palette status of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestionStatus {
    Unsolved,
    Solved,
    Review,
    AttemptedReview,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A single user's run through one exam paper.
///
/// Starts in `Guidelines` behind the terms gate, runs both halves of the
/// paper around the one-shot break, and ends in the terminal `Finished`
/// phase where the score report is derived exactly once.
pub struct ExamSession {
    attempt_id: AttemptId,
    paper: ExamPaper,
    phase: SessionPhase,
    cursor: usize,
    answers: Vec<Option<usize>>,
    bookmarks: BTreeSet<usize>,
    exam_seconds_left: u32,
    break_seconds_left: u32,
    break_taken: bool,
    terms_accepted: bool,
    review_open: bool,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    finish_reason: Option<FinishReason>,
    report: Option<ScoreReport>,
    clock: Clock,
}

impl ExamSession {
    /// Create a session for the given paper, waiting in `Guidelines`.
    #[must_use]
    pub fn new(paper: ExamPaper) -> Self {
        let len = paper.question_count();
        let exam_seconds_left = paper.settings().exam_seconds();
        let break_seconds_left = paper.settings().break_seconds();

        Self {
            attempt_id: AttemptId::new(),
            paper,
            phase: SessionPhase::Guidelines,
            cursor: 0,
            answers: vec![None; len],
            bookmarks: BTreeSet::new(),
            exam_seconds_left,
            break_seconds_left,
            break_taken: false,
            terms_accepted: false,
            review_open: false,
            started_at: None,
            finished_at: None,
            finish_reason: None,
            report: None,
            clock: Clock::default(),
        }
    }

    /// Replace the timestamp source, mainly for deterministic tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    //
    // ─── GUIDELINES GATE ───────────────────────────────────────────────────
    //

    /// Record the user's agreement (or withdrawal) on the terms checkbox.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Unavailable` outside the `Guidelines` phase.
    pub fn set_terms_accepted(&mut self, accepted: bool) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Guidelines {
            return Err(SessionError::Unavailable { phase: self.phase });
        }
        self.terms_accepted = accepted;
        Ok(())
    }

    /// Move from `Guidelines` to `InProgress` and start the exam clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::TermsNotAccepted` while the gate is unchecked
    /// and `SessionError::DoubleTransition` once the exam has started.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Guidelines if !self.terms_accepted => {
                Err(SessionError::TermsNotAccepted)
            }
            SessionPhase::Guidelines => {
                self.started_at = Some(self.clock.now());
                self.phase = SessionPhase::InProgress;
                Ok(())
            }
            _ => Err(SessionError::DoubleTransition),
        }
    }

    //
    // ─── ANSWERS & BOOKMARKS ───────────────────────────────────────────────
    //

    /// Record an option for the current question, overwriting any earlier
    /// choice. With `auto_advance` enabled the session then moves on exactly
    /// as `go_next` would, break transition included.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRangeSelection` for an option outside the
    /// current question's bounds and `SessionError::Unavailable` outside
    /// `InProgress`.
    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::Unavailable { phase: self.phase });
        }
        let question = &self.paper.questions()[self.cursor];
        if option >= question.option_count() {
            return Err(SessionError::OutOfRangeSelection { option });
        }

        self.answers[self.cursor] = Some(option);
        if self.paper.settings().auto_advance() {
            self.go_next()?;
        }
        Ok(())
    }

    /// Flip the bookmark on a question. Toggling twice restores the set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` for an invalid index and
    /// `SessionError::Unavailable` outside `InProgress`.
    pub fn toggle_bookmark(&mut self, index: usize) -> Result<(), SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::Unavailable { phase: self.phase });
        }
        if index >= self.paper.question_count() {
            return Err(SessionError::UnknownQuestion { index });
        }

        if !self.bookmarks.insert(index) {
            self.bookmarks.remove(&index);
        }
        Ok(())
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────
    //

    /// Advance the cursor by one. At the end of the first half with the
    /// break still pending this becomes the break transition instead; at the
    /// last question it is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Unavailable` in phases without navigation.
    pub fn go_next(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress => {
                let half = self.paper.first_half_len();
                if !self.break_taken && self.cursor + 1 == half && self.paper.question_count() > half {
                    self.phase = SessionPhase::OnBreak;
                    return Ok(());
                }
                if self.cursor + 1 < self.paper.question_count() {
                    self.cursor += 1;
                }
                Ok(())
            }
            SessionPhase::Finished if self.review_open => {
                if self.cursor + 1 < self.paper.question_count() {
                    self.cursor += 1;
                }
                Ok(())
            }
            phase => Err(SessionError::Unavailable { phase }),
        }
    }

    /// Move the cursor back by one; a no-op at the first question. Backward
    /// movement across the half boundary is allowed once the break is over.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Unavailable` in phases without navigation.
    pub fn go_previous(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress => {
                self.cursor = self.cursor.saturating_sub(1);
                Ok(())
            }
            SessionPhase::Finished if self.review_open => {
                self.cursor = self.cursor.saturating_sub(1);
                Ok(())
            }
            phase => Err(SessionError::Unavailable { phase }),
        }
    }

    /// Jump straight to a question, subject to the second-half lock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` for an invalid index,
    /// `SessionError::LockedNavigation` for a second-half target before the
    /// break resolves, and `SessionError::Unavailable` in other phases.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress => {
                if index >= self.paper.question_count() {
                    return Err(SessionError::UnknownQuestion { index });
                }
                if !self.break_taken && index >= self.paper.first_half_len() {
                    return Err(SessionError::LockedNavigation { index });
                }
                self.cursor = index;
                Ok(())
            }
            SessionPhase::Finished if self.review_open => {
                if index >= self.paper.question_count() {
                    return Err(SessionError::UnknownQuestion { index });
                }
                self.cursor = index;
                Ok(())
            }
            phase => Err(SessionError::Unavailable { phase }),
        }
    }

    //
    // ─── BREAK & FINISH ────────────────────────────────────────────────────
    //

    /// End the break early. The break clock stops where it is.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DoubleTransition` when the break was already
    /// taken and `SessionError::Unavailable` before the break starts.
    pub fn skip_break(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::OnBreak => {
                self.resume_from_break();
                Ok(())
            }
            _ if self.break_taken => Err(SessionError::DoubleTransition),
            phase => Err(SessionError::Unavailable { phase }),
        }
    }

    /// Submit the attempt from the last question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DoubleTransition` once finished and
    /// `SessionError::Unavailable` anywhere but the last question of an
    /// in-progress exam.
    pub fn submit(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress if self.cursor + 1 == self.paper.question_count() => {
                self.finish(FinishReason::Submitted)
            }
            SessionPhase::Finished => Err(SessionError::DoubleTransition),
            phase => Err(SessionError::Unavailable { phase }),
        }
    }

    /// Consume one elapsed-second event from the tick source. The phase
    /// decides which clock decrements; a clock reaching zero fires its
    /// transition exactly once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StaleTick` when no clock is live, so a timer
    /// callback surviving a phase change cannot touch a frozen clock.
    pub fn tick(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress => {
                self.exam_seconds_left = self.exam_seconds_left.saturating_sub(1);
                if self.exam_seconds_left == 0 {
                    self.finish(FinishReason::TimeExpired)?;
                }
                Ok(())
            }
            SessionPhase::OnBreak => {
                self.break_seconds_left = self.break_seconds_left.saturating_sub(1);
                if self.break_seconds_left == 0 {
                    self.resume_from_break();
                }
                Ok(())
            }
            phase => Err(SessionError::StaleTick { phase }),
        }
    }

    fn resume_from_break(&mut self) {
        self.break_taken = true;
        self.cursor = self.paper.first_half_len();
        self.phase = SessionPhase::InProgress;
    }

    fn finish(&mut self, reason: FinishReason) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Finished {
            return Err(SessionError::DoubleTransition);
        }
        let time_spent = self.paper.settings().exam_seconds() - self.exam_seconds_left;
        let report = ScoreReport::derive(self.paper.questions(), &self.answers, time_spent)?;

        self.report = Some(report);
        self.finish_reason = Some(reason);
        self.finished_at = Some(self.clock.now());
        self.phase = SessionPhase::Finished;
        Ok(())
    }

    //
    // ─── ANSWER REVIEW ─────────────────────────────────────────────────────
    //

    /// Open the read-only answer review over the finished attempt. The
    /// cursor rewinds to the first question; answers, bookmarks, and clocks
    /// stay frozen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Unavailable` before the attempt finishes.
    pub fn begin_review(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Finished {
            return Err(SessionError::Unavailable { phase: self.phase });
        }
        if !self.review_open {
            self.review_open = true;
            self.cursor = 0;
        }
        Ok(())
    }

    /// Close the answer review.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Unavailable` before the attempt finishes.
    pub fn end_review(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Finished {
            return Err(SessionError::Unavailable { phase: self.phase });
        }
        self.review_open = false;
        Ok(())
    }

    //
    // ─── VIEWS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn paper(&self) -> &ExamPaper {
        &self.paper
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.paper.questions()[self.cursor]
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn bookmarks(&self) -> &BTreeSet<usize> {
        &self.bookmarks
    }

    #[must_use]
    pub fn exam_seconds_left(&self) -> u32 {
        self.exam_seconds_left
    }

    #[must_use]
    pub fn break_seconds_left(&self) -> u32 {
        self.break_seconds_left
    }

    #[must_use]
    pub fn break_taken(&self) -> bool {
        self.break_taken
    }

    #[must_use]
    pub fn is_review_open(&self) -> bool {
        self.review_open
    }

    /// True while the cursor sits in the first half of the paper.
    #[must_use]
    pub fn is_first_half(&self) -> bool {
        self.cursor < self.paper.first_half_len()
    }

    /// True while the phase owns a decrementing clock.
    #[must_use]
    pub fn has_live_clock(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::InProgress | SessionPhase::OnBreak
        )
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    #[must_use]
    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    /// Number of questions with a recorded answer.
    #[must_use]
    pub fn attempted_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Number of first-half questions with a recorded answer, as shown on
    /// the break screen.
    #[must_use]
    pub fn first_half_answered(&self) -> usize {
        self.answers[..self.paper.first_half_len()]
            .iter()
            .filter(|a| a.is_some())
            .count()
    }

    /// Palette status for one question. Answered-and-bookmarked outranks
    /// answered, which outranks bookmarked.
    #[must_use]
    pub fn question_status(&self, index: usize) -> Option<QuestionStatus> {
        let answered = self.answers.get(index)?.is_some();
        let bookmarked = self.bookmarks.contains(&index);

        Some(match (answered, bookmarked) {
            (true, true) => QuestionStatus::AttemptedReview,
            (true, false) => QuestionStatus::Solved,
            (false, true) => QuestionStatus::Review,
            (false, false) => QuestionStatus::Unsolved,
        })
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("attempt_id", &self.attempt_id)
            .field("exam_id", &self.paper.id())
            .field("phase", &self.phase)
            .field("cursor", &self.cursor)
            .field("answered", &self.attempted_count())
            .field("exam_seconds_left", &self.exam_seconds_left)
            .field("break_seconds_left", &self.break_seconds_left)
            .field("break_taken", &self.break_taken)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExamId, ExamSettings, Question, QuestionId};
    use crate::time::fixed_clock;

    fn build_question(id: u64) -> Question {
        // Option 0 is always the correct one for these fixtures.
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["right".to_string(), "wrong".to_string(), "also wrong".to_string()],
            0,
        )
        .unwrap()
    }

    fn build_paper(count: u64, settings: ExamSettings) -> ExamPaper {
        let questions = (1..=count).map(build_question).collect();
        ExamPaper::new(ExamId::new(1), "Mock", None, settings, questions).unwrap()
    }

    fn started_session(count: u64) -> ExamSession {
        started_session_with(count, ExamSettings::default())
    }

    fn started_session_with(count: u64, settings: ExamSettings) -> ExamSession {
        let mut session = ExamSession::new(build_paper(count, settings)).with_clock(fixed_clock());
        session.set_terms_accepted(true).unwrap();
        session.start().unwrap();
        session
    }

    #[test]
    fn start_requires_accepted_terms() {
        let mut session = ExamSession::new(build_paper(4, ExamSettings::default()));
        assert!(matches!(
            session.start().unwrap_err(),
            SessionError::TermsNotAccepted
        ));

        session.set_terms_accepted(true).unwrap();
        session.start().unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert!(session.started_at().is_some());

        assert!(matches!(
            session.start().unwrap_err(),
            SessionError::DoubleTransition
        ));
    }

    #[test]
    fn fresh_session_has_empty_bookkeeping() {
        let session = started_session(6);
        assert_eq!(session.answers().len(), 6);
        assert!(session.answers().iter().all(Option::is_none));
        assert!(session.bookmarks().is_empty());
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.exam_seconds_left(), 3600);
        assert_eq!(session.break_seconds_left(), 90);
    }

    #[test]
    fn selection_overwrites_and_validates_bounds() {
        let mut session = started_session(4);

        session.select_option(1).unwrap();
        assert_eq!(session.answers()[0], Some(1));

        session.select_option(0).unwrap();
        assert_eq!(session.answers()[0], Some(0));

        let err = session.select_option(9).unwrap_err();
        assert!(matches!(err, SessionError::OutOfRangeSelection { option: 9 }));
        assert_eq!(session.answers()[0], Some(0));
    }

    #[test]
    fn auto_advance_moves_to_the_next_question() {
        let settings = ExamSettings::default().with_auto_advance(true);
        let mut session = started_session_with(6, settings);

        session.select_option(0).unwrap();
        assert_eq!(session.cursor(), 1);

        // At the end of the first half the auto-advance trips the break.
        session.jump_to(2).unwrap();
        session.select_option(0).unwrap();
        assert_eq!(session.phase(), SessionPhase::OnBreak);
    }

    #[test]
    fn bookmark_toggle_is_an_involution() {
        let mut session = started_session(4);

        session.toggle_bookmark(2).unwrap();
        assert!(session.bookmarks().contains(&2));

        session.toggle_bookmark(2).unwrap();
        assert!(session.bookmarks().is_empty());

        let err = session.toggle_bookmark(4).unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuestion { index: 4 }));
    }

    #[test]
    fn status_precedence_is_attempted_review_first() {
        let mut session = started_session(4);
        session.select_option(1).unwrap();
        session.toggle_bookmark(0).unwrap();
        session.toggle_bookmark(1).unwrap();
        session.jump_to(2).unwrap();
        session.select_option(0).unwrap();

        assert_eq!(
            session.question_status(0),
            Some(QuestionStatus::AttemptedReview)
        );
        assert_eq!(session.question_status(1), Some(QuestionStatus::Review));
        assert_eq!(session.question_status(2), Some(QuestionStatus::Solved));
        assert_eq!(session.question_status(3), Some(QuestionStatus::Unsolved));
        assert_eq!(session.question_status(4), None);
    }

    #[test]
    fn next_at_half_boundary_enters_the_break_once() {
        let mut session = started_session(10);

        for _ in 0..4 {
            session.go_next().unwrap();
        }
        assert_eq!(session.cursor(), 4);
        assert!(session.is_first_half());

        session.go_next().unwrap();
        assert_eq!(session.phase(), SessionPhase::OnBreak);
        assert_eq!(session.cursor(), 4, "cursor freezes during the break");

        session.skip_break().unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.cursor(), 5);
        assert!(session.break_taken());
        assert!(!session.is_first_half());

        // Crossing the boundary again in either direction never re-breaks.
        session.go_previous().unwrap();
        assert_eq!(session.cursor(), 4);
        session.go_next().unwrap();
        assert_eq!(session.cursor(), 5);
        assert_eq!(session.phase(), SessionPhase::InProgress);

        assert!(matches!(
            session.skip_break().unwrap_err(),
            SessionError::DoubleTransition
        ));
    }

    #[test]
    fn break_clock_running_out_resumes_the_second_half() {
        let mut session = started_session(10);
        session.jump_to(4).unwrap();
        session.go_next().unwrap();
        assert_eq!(session.phase(), SessionPhase::OnBreak);

        let exam_left_before = session.exam_seconds_left();
        for _ in 0..90 {
            session.tick().unwrap();
        }

        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.cursor(), 5);
        assert!(session.break_taken());
        assert_eq!(
            session.exam_seconds_left(),
            exam_left_before,
            "exam clock is frozen during the break"
        );
    }

    #[test]
    fn second_half_is_locked_before_the_break() {
        let mut session = started_session(10);

        let err = session.jump_to(5).unwrap_err();
        assert!(matches!(err, SessionError::LockedNavigation { index: 5 }));
        assert_eq!(session.cursor(), 0);

        session.jump_to(3).unwrap();
        assert_eq!(session.cursor(), 3);

        let err = session.jump_to(11).unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuestion { index: 11 }));
    }

    #[test]
    fn previous_stops_at_zero() {
        let mut session = started_session(4);
        session.go_previous().unwrap();
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn next_at_last_question_is_a_no_op() {
        let mut session = started_session(4);
        session.go_next().unwrap();
        session.go_next().unwrap();
        session.skip_break().unwrap();
        session.go_next().unwrap();
        assert_eq!(session.cursor(), 3);

        session.go_next().unwrap();
        assert_eq!(session.cursor(), 3);
        assert_eq!(session.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn single_question_paper_never_breaks() {
        let mut session = started_session(1);
        session.go_next().unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn submit_only_from_the_last_question() {
        let mut session = started_session(4);

        assert!(matches!(
            session.submit().unwrap_err(),
            SessionError::Unavailable { .. }
        ));

        session.go_next().unwrap();
        session.go_next().unwrap();
        session.skip_break().unwrap();
        session.go_next().unwrap();
        session.submit().unwrap();

        assert_eq!(session.phase(), SessionPhase::Finished);
        assert_eq!(session.finish_reason(), Some(FinishReason::Submitted));
        assert!(session.finished_at().is_some());

        assert!(matches!(
            session.submit().unwrap_err(),
            SessionError::DoubleTransition
        ));
    }

    #[test]
    fn all_correct_submission_scores_one_hundred() {
        // Answer all five questions correctly, submit from the last.
        let mut session = started_session(5);
        for _ in 0..3 {
            session.select_option(0).unwrap();
            session.go_next().unwrap();
        }
        assert_eq!(session.phase(), SessionPhase::OnBreak);
        session.skip_break().unwrap();
        session.select_option(0).unwrap();
        session.go_next().unwrap();
        session.select_option(0).unwrap();
        session.submit().unwrap();

        let report = session.report().unwrap();
        assert_eq!(report.correct(), 5);
        assert_eq!(report.wrong(), 0);
        assert_eq!(report.unattempted(), 0);
        assert_eq!(report.score_percent(), 100);
    }

    #[test]
    fn exam_clock_expiry_finishes_before_the_break() {
        // Three first-half answers, then the exam clock runs out.
        let settings = ExamSettings::new(5, 90, false).unwrap();
        let mut session = started_session_with(10, settings);
        for _ in 0..3 {
            session.select_option(0).unwrap();
            session.go_next().unwrap();
        }

        for _ in 0..5 {
            session.tick().unwrap();
        }

        assert_eq!(session.phase(), SessionPhase::Finished);
        assert_eq!(session.finish_reason(), Some(FinishReason::TimeExpired));
        assert!(!session.break_taken(), "break never triggered");

        let report = session.report().unwrap();
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.unattempted(), 7);
        assert_eq!(report.time_spent_seconds(), 5);
    }

    #[test]
    fn ticks_after_finish_are_stale_and_change_nothing() {
        let settings = ExamSettings::new(2, 90, false).unwrap();
        let mut session = started_session_with(4, settings);
        session.tick().unwrap();
        session.tick().unwrap();
        assert_eq!(session.phase(), SessionPhase::Finished);

        let exam_left = session.exam_seconds_left();
        let break_left = session.break_seconds_left();
        for _ in 0..3 {
            assert!(matches!(
                session.tick().unwrap_err(),
                SessionError::StaleTick { .. }
            ));
        }
        assert_eq!(session.exam_seconds_left(), exam_left);
        assert_eq!(session.break_seconds_left(), break_left);
    }

    #[test]
    fn ticks_before_start_are_stale() {
        let mut session = ExamSession::new(build_paper(4, ExamSettings::default()));
        assert!(matches!(
            session.tick().unwrap_err(),
            SessionError::StaleTick {
                phase: SessionPhase::Guidelines
            }
        ));
        assert_eq!(session.exam_seconds_left(), 3600);
    }

    #[test]
    fn attempted_and_unattempted_partition_after_any_sequence() {
        let mut session = started_session(7);
        session.select_option(2).unwrap();
        session.go_next().unwrap();
        session.select_option(0).unwrap();
        session.toggle_bookmark(1).unwrap();
        session.go_next().unwrap();
        session.go_previous().unwrap();
        session.select_option(1).unwrap();

        let attempted = session.attempted_count();
        let unattempted = session
            .answers()
            .iter()
            .filter(|a| a.is_none())
            .count();
        assert_eq!(attempted + unattempted, 7);
    }

    #[test]
    fn review_is_read_only_navigation_over_the_record() {
        let mut session = started_session(4);
        session.select_option(1).unwrap();
        session.go_next().unwrap();
        session.go_next().unwrap();
        session.skip_break().unwrap();
        session.go_next().unwrap();
        session.submit().unwrap();

        session.begin_review().unwrap();
        assert!(session.is_review_open());
        assert_eq!(session.cursor(), 0);

        // The record is navigable but immutable.
        session.go_next().unwrap();
        session.jump_to(3).unwrap();
        session.go_previous().unwrap();
        assert_eq!(session.cursor(), 2);

        assert!(matches!(
            session.select_option(0).unwrap_err(),
            SessionError::Unavailable { .. }
        ));
        assert!(matches!(
            session.toggle_bookmark(0).unwrap_err(),
            SessionError::Unavailable { .. }
        ));
        assert_eq!(session.answers()[0], Some(1));

        let report_before = session.report().cloned();
        session.end_review().unwrap();
        assert!(!session.is_review_open());
        assert_eq!(session.report().cloned(), report_before);
    }

    #[test]
    fn review_cannot_open_before_finish() {
        let mut session = started_session(4);
        assert!(matches!(
            session.begin_review().unwrap_err(),
            SessionError::Unavailable { .. }
        ));
    }

    #[test]
    fn navigation_is_rejected_during_the_break() {
        let mut session = started_session(10);
        session.jump_to(4).unwrap();
        session.go_next().unwrap();
        assert_eq!(session.phase(), SessionPhase::OnBreak);

        assert!(session.go_next().is_err());
        assert!(session.go_previous().is_err());
        assert!(session.jump_to(0).is_err());
        assert!(session.select_option(0).is_err());
        assert_eq!(session.cursor(), 4);
    }
}
