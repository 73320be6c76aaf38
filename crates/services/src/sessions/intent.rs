/// Discrete user intents accepted by the session controller.
///
/// Each variant is one atomic call into the core; the presentation layer
/// never mutates session state directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionIntent {
    /// Check or uncheck the terms agreement on the guidelines screen.
    AcceptTerms(bool),
    /// Leave the guidelines and start the exam clock.
    StartExam,
    /// Choose an option for the question under the cursor.
    SelectOption(usize),
    GoNext,
    GoPrevious,
    JumpTo(usize),
    ToggleBookmark(usize),
    /// Hand in the attempt from the last question.
    Submit,
    /// End the mid-exam break early.
    SkipBreak,
    /// Open the read-only answer review of a finished attempt.
    BeginReview,
    /// Close the answer review.
    EndReview,
}
