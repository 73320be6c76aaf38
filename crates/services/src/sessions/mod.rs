mod controller;
mod intent;
mod progress;
mod view;
mod workflow;

pub use controller::SessionController;
pub use intent::SessionIntent;
pub use progress::SessionProgress;
pub use view::{AnswerReviewItem, QuestionView, SessionSnapshot};
pub use workflow::{SessionLoop, SessionLoopError};
