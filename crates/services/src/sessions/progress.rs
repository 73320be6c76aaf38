use serde::Serialize;

use exam_core::session::ExamSession;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// First-half questions answered so far; the break screen's counter.
    pub first_half_answered: usize,
}

impl SessionProgress {
    #[must_use]
    pub fn of(session: &ExamSession) -> Self {
        let total = session.paper().question_count();
        let answered = session.attempted_count();
        Self {
            total,
            answered,
            remaining: total - answered,
            first_half_answered: session.first_half_answered(),
        }
    }
}
