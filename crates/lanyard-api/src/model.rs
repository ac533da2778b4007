use serde::{Deserialize, Serialize};

/// Attendee record as listed by the events backend. Read-only here; the
/// backend owns creation and mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attendee {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub email: String,
    pub event: u64,
    #[serde(default)]
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub id: u64,
    pub event: u64,
    pub name: String,
}

/// Body of a control registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControlSubmission {
    pub attendee_id: u64,
    pub event_id: u64,
    pub activity_id: u64,
    pub attendee_email: String,
}

/// Check-in proof created by a successful control registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControlRecord {
    pub id: u64,
    pub attendee_id: u64,
    pub event_id: u64,
    pub activity_id: u64,
    pub attendee_email: String,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
}

/// Full question tree of one survey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SurveyTree {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: u64,
    pub text: String,
    pub qtype: QuestionKind,
    // Unique per survey at the backend, including soft-deleted rows.
    pub order: u32,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    SingleChoice,
    YesNo,
    FreeText,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionOption {
    pub id: u64,
    // Display position within the question, starting at 1.
    pub seq: u32,
    pub value: String,
}
