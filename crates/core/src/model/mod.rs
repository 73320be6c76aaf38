mod exam;
mod ids;
mod question;
mod report;

pub use exam::{
    DEFAULT_BREAK_SECONDS, DEFAULT_EXAM_SECONDS, ExamError, ExamPaper, ExamSettings,
    ExamSettingsError, PaperDraft,
};
pub use ids::{AttemptId, ExamId, ParseIdError, QuestionId};
pub use question::{Question, QuestionDraft, QuestionError};
pub use report::{AnswerVerdict, ReportError, ScoreReport};
