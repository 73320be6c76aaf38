use std::collections::BTreeSet;

use tracing::info;

use exam_core::Clock;
use exam_core::model::{ExamId, ExamPaper};
use exam_core::session::ExamSession;

use crate::error::CatalogError;
use crate::sessions::SessionController;

/// What an exam listing shows for one paper: enough to pick an exam, nothing
/// about its questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamCardInfo {
    pub exam_id: ExamId,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: u32,
    pub question_count: usize,
}

impl ExamCardInfo {
    #[must_use]
    pub fn from_paper(paper: &ExamPaper) -> Self {
        Self {
            exam_id: paper.id(),
            title: paper.title().to_string(),
            description: paper.description().map(str::to_string),
            duration_minutes: paper.duration_minutes(),
            question_count: paper.question_count(),
        }
    }
}

/// The pre-loaded set of exam papers a user can attempt.
///
/// Papers are read-only once the catalog is built; starting an attempt hands
/// out a fresh session over a copy of the paper.
#[derive(Debug)]
pub struct ExamCatalog {
    papers: Vec<ExamPaper>,
}

impl ExamCatalog {
    /// Build a catalog from validated papers.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateExam` when two papers share an id.
    pub fn new(papers: Vec<ExamPaper>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for paper in &papers {
            if !seen.insert(paper.id()) {
                return Err(CatalogError::DuplicateExam(paper.id()));
            }
        }
        Ok(Self { papers })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Card data for every paper, in catalog order.
    #[must_use]
    pub fn list(&self) -> Vec<ExamCardInfo> {
        self.papers.iter().map(ExamCardInfo::from_paper).collect()
    }

    #[must_use]
    pub fn paper(&self, exam_id: ExamId) -> Option<&ExamPaper> {
        self.papers.iter().find(|paper| paper.id() == exam_id)
    }

    /// Start a new attempt at the given exam.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownExam` when no paper has that id.
    pub fn start_attempt(&self, exam_id: ExamId) -> Result<SessionController, CatalogError> {
        self.start_attempt_with_clock(exam_id, Clock::default_clock())
    }

    /// Start a new attempt with an explicit timestamp source.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownExam` when no paper has that id.
    pub fn start_attempt_with_clock(
        &self,
        exam_id: ExamId,
        clock: Clock,
    ) -> Result<SessionController, CatalogError> {
        let paper = self
            .paper(exam_id)
            .ok_or(CatalogError::UnknownExam(exam_id))?;
        info!(%exam_id, title = paper.title(), "starting attempt");

        let session = ExamSession::new(paper.clone()).with_clock(clock);
        Ok(SessionController::new(session))
    }
}
