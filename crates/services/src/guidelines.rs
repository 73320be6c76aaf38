use serde::Serialize;

/// Pre-exam guidance and the terms text behind the start gate.
///
/// Plain data; the presentation layer decides how to render it. Accepting
/// the terms is a session intent, not something this type tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guidelines {
    items: Vec<String>,
    terms: String,
}

impl Guidelines {
    #[must_use]
    pub fn new(items: Vec<String>, terms: impl Into<String>) -> Self {
        Self {
            items,
            terms: terms.into(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn terms(&self) -> &str {
        &self.terms
    }
}

impl Default for Guidelines {
    fn default() -> Self {
        Self {
            items: [
                "Read each question carefully before answering.",
                "You have a total of 60 minutes to complete the exam.",
                "There will be a break after the first half of the questions.",
                "You can mark questions for review and come back to them later.",
                "Ensure you have a stable internet connection throughout the exam.",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            terms: "By proceeding with this exam, you agree to abide by all rules and \
                    regulations set forth by the examining body. Any form of cheating or \
                    misconduct will result in immediate disqualification."
                .to_string(),
        }
    }
}
