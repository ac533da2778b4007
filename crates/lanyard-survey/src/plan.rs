use lanyard_api::QuestionKind;
use serde::{Deserialize, Serialize};

// Fixed labels for yes/no questions, matching what the kiosks render.
pub const YES_LABEL: &str = "Sí";
pub const NO_LABEL: &str = "No";

/// One question of the desired tree, before any backend ids exist.
///
/// Order numbers are assigned during reconciliation, never by the editor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DesiredQuestion {
    pub text: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

impl DesiredQuestion {
    /// Option values to create for this question, in display order.
    ///
    /// Yes/no questions always get the two fixed labels; choice questions
    /// keep their non-empty values; free text has no options.
    pub fn option_values(&self) -> Vec<&str> {
        match self.kind {
            QuestionKind::YesNo => vec![YES_LABEL, NO_LABEL],
            QuestionKind::MultipleChoice | QuestionKind::SingleChoice => self
                .options
                .iter()
                .map(String::as_str)
                .filter(|value| !value.trim().is_empty())
                .collect(),
            QuestionKind::FreeText => Vec::new(),
        }
    }

    // Questions without text are editor leftovers and are never created.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
