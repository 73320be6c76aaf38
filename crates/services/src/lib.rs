#![forbid(unsafe_code)]

pub mod bank;
pub mod catalog;
pub mod error;
pub mod guidelines;
pub mod sessions;

pub use exam_core::Clock;

pub use catalog::{ExamCardInfo, ExamCatalog};
pub use error::{BankError, CatalogError};
pub use guidelines::Guidelines;
pub use sessions::{
    AnswerReviewItem, QuestionView, SessionController, SessionIntent, SessionLoop,
    SessionLoopError, SessionProgress, SessionSnapshot,
};
