use tracing::{debug, info};

use exam_core::session::{ExamSession, SessionPhase};

use super::intent::SessionIntent;
use super::view::{AnswerReviewItem, SessionSnapshot};

/// The single serialized mutation point for one exam attempt.
///
/// Owns the `ExamSession` and applies intents and ticks one at a time. Core
/// rejections are absorbed here: invalid or late input is logged and becomes
/// a no-op, never a crash, so the state machine cannot be driven into an
/// undefined state from the outside.
#[derive(Debug)]
pub struct SessionController {
    session: ExamSession,
}

impl SessionController {
    #[must_use]
    pub fn new(session: ExamSession) -> Self {
        info!(
            attempt_id = %session.attempt_id(),
            exam_id = %session.paper().id(),
            questions = session.paper().question_count(),
            "attempt created"
        );
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    /// True while the current phase owns a decrementing clock.
    #[must_use]
    pub fn has_live_clock(&self) -> bool {
        self.session.has_live_clock()
    }

    /// Project the current state for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::of(&self.session)
    }

    /// Answer review rows for a finished attempt, empty before that.
    #[must_use]
    pub fn answer_review(&self) -> Vec<AnswerReviewItem> {
        AnswerReviewItem::list_for(&self.session)
    }

    /// Apply one user intent and return the refreshed snapshot.
    pub fn apply(&mut self, intent: SessionIntent) -> SessionSnapshot {
        let phase_before = self.session.phase();
        let result = match intent {
            SessionIntent::AcceptTerms(accepted) => self.session.set_terms_accepted(accepted),
            SessionIntent::StartExam => self.session.start(),
            SessionIntent::SelectOption(option) => self.session.select_option(option),
            SessionIntent::GoNext => self.session.go_next(),
            SessionIntent::GoPrevious => self.session.go_previous(),
            SessionIntent::JumpTo(index) => self.session.jump_to(index),
            SessionIntent::ToggleBookmark(index) => self.session.toggle_bookmark(index),
            SessionIntent::Submit => self.session.submit(),
            SessionIntent::SkipBreak => self.session.skip_break(),
            SessionIntent::BeginReview => self.session.begin_review(),
            SessionIntent::EndReview => self.session.end_review(),
        };

        if let Err(rejection) = result {
            debug!(?intent, %rejection, "intent rejected");
        } else if self.session.phase() != phase_before {
            info!(
                attempt_id = %self.session.attempt_id(),
                from = ?phase_before,
                to = ?self.session.phase(),
                "phase transition"
            );
        }

        self.snapshot()
    }

    /// Consume one elapsed-second event and return the refreshed snapshot.
    /// Ticks landing in a phase without a live clock are ignored.
    pub fn tick(&mut self) -> SessionSnapshot {
        let phase_before = self.session.phase();
        if let Err(rejection) = self.session.tick() {
            debug!(%rejection, "tick ignored");
        } else if self.session.phase() != phase_before {
            info!(
                attempt_id = %self.session.attempt_id(),
                from = ?phase_before,
                to = ?self.session.phase(),
                "clock fired phase transition"
            );
        }

        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{ExamId, ExamPaper, ExamSettings, Question, QuestionId};
    use exam_core::session::QuestionStatus;

    fn build_controller(count: u64, exam_seconds: u32) -> SessionController {
        let questions = (1..=count)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Q{id}"),
                    vec!["right".to_string(), "wrong".to_string()],
                    0,
                )
                .unwrap()
            })
            .collect();
        let settings = ExamSettings::new(exam_seconds, 90, false).unwrap();
        let paper =
            ExamPaper::new(ExamId::new(1), "Mock", None, settings, questions).unwrap();
        SessionController::new(ExamSession::new(paper))
    }

    fn start(controller: &mut SessionController) {
        controller.apply(SessionIntent::AcceptTerms(true));
        controller.apply(SessionIntent::StartExam);
    }

    #[test]
    fn rejected_intents_leave_the_snapshot_unchanged() {
        let mut controller = build_controller(10, 3600);
        start(&mut controller);
        let before = controller.snapshot();

        // Locked jump, out-of-range option, premature submit: all no-ops.
        let after = controller.apply(SessionIntent::JumpTo(7));
        assert_eq!(after, before);
        let after = controller.apply(SessionIntent::SelectOption(9));
        assert_eq!(after, before);
        let after = controller.apply(SessionIntent::Submit);
        assert_eq!(after, before);
    }

    #[test]
    fn start_is_gated_on_terms() {
        let mut controller = build_controller(4, 3600);

        let snapshot = controller.apply(SessionIntent::StartExam);
        assert_eq!(snapshot.phase, SessionPhase::Guidelines);

        controller.apply(SessionIntent::AcceptTerms(true));
        let snapshot = controller.apply(SessionIntent::StartExam);
        assert_eq!(snapshot.phase, SessionPhase::InProgress);
    }

    #[test]
    fn ticks_drive_the_exam_to_expiry() {
        let mut controller = build_controller(4, 3);
        start(&mut controller);

        controller.tick();
        controller.tick();
        let snapshot = controller.tick();

        assert_eq!(snapshot.phase, SessionPhase::Finished);
        let report = snapshot.report.expect("report derived at finish");
        assert_eq!(report.time_spent_seconds(), 3);

        // Late ticks are absorbed without touching the frozen clocks.
        let after = controller.tick();
        assert_eq!(after.exam_seconds_left, 0);
        assert_eq!(after.break_seconds_left, 90);
    }

    #[test]
    fn full_intent_round_trip_produces_statuses_and_review() {
        let mut controller = build_controller(4, 3600);
        start(&mut controller);

        controller.apply(SessionIntent::SelectOption(0));
        controller.apply(SessionIntent::ToggleBookmark(1));
        controller.apply(SessionIntent::GoNext);
        controller.apply(SessionIntent::GoNext);
        let snapshot = controller.apply(SessionIntent::SkipBreak);
        assert_eq!(snapshot.cursor, 2);
        assert_eq!(snapshot.statuses[0], QuestionStatus::Solved);
        assert_eq!(snapshot.statuses[1], QuestionStatus::Review);

        controller.apply(SessionIntent::GoNext);
        let snapshot = controller.apply(SessionIntent::Submit);
        assert_eq!(snapshot.phase, SessionPhase::Finished);

        let review = controller.answer_review();
        assert_eq!(review.len(), 4);
        assert_eq!(review[0].selected, Some(0));
    }
}
