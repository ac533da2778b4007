//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the payload shapes of the back-office REST API and the OpenAPI
//! schema generation. Backend records from `lanyard-api` are mirrored into
//! response types here so the wire surface stays stable even if the client
//! models grow fields.
use lanyard_api::{Attendee, ControlRecord, Event};
use lanyard_checkin::ScanPhase;
use lanyard_survey::{CreatedQuestion, DesiredQuestion};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub service: String,
    pub api_version: String,
    pub backend_url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

/// One badge scan from an operator station.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ScanRequest {
    /// Raw QR payload exactly as scanned.
    pub payload: String,
    /// Activity the station is checking people into.
    pub activity_id: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Scanning,
    Matched,
    AwaitingConfirmation,
    Submitting,
    Success,
    Failed,
}

impl From<ScanPhase> for SessionPhase {
    fn from(phase: ScanPhase) -> Self {
        match phase {
            ScanPhase::Idle => SessionPhase::Idle,
            ScanPhase::Scanning => SessionPhase::Scanning,
            ScanPhase::Matched => SessionPhase::Matched,
            ScanPhase::AwaitingConfirmation => SessionPhase::AwaitingConfirmation,
            ScanPhase::Submitting => SessionPhase::Submitting,
            ScanPhase::Success => SessionPhase::Success,
            ScanPhase::Failed => SessionPhase::Failed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AttendeeSummary {
    pub id: u64,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
}

impl From<&Attendee> for AttendeeSummary {
    fn from(attendee: &Attendee) -> Self {
        Self {
            id: attendee.id,
            name: attendee.name.clone(),
            company: attendee.company.clone(),
            email: attendee.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ScanResponse {
    pub session_id: Uuid,
    pub phase: SessionPhase,
    pub attendee: AttendeeSummary,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ControlRow {
    pub id: u64,
    pub attendee_id: u64,
    pub event_id: u64,
    pub activity_id: u64,
    pub attendee_email: String,
    pub created_date: Option<String>,
    pub created_time: Option<String>,
}

impl From<&ControlRecord> for ControlRow {
    fn from(record: &ControlRecord) -> Self {
        Self {
            id: record.id,
            attendee_id: record.attendee_id,
            event_id: record.event_id,
            activity_id: record.activity_id,
            attendee_email: record.attendee_email.clone(),
            created_date: record.created_date.clone(),
            created_time: record.created_time.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ConfirmResponse {
    pub phase: SessionPhase,
    pub control: ControlRow,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    SingleChoice,
    YesNo,
    FreeText,
}

impl From<QuestionKind> for lanyard_api::QuestionKind {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::MultipleChoice => lanyard_api::QuestionKind::MultipleChoice,
            QuestionKind::SingleChoice => lanyard_api::QuestionKind::SingleChoice,
            QuestionKind::YesNo => lanyard_api::QuestionKind::YesNo,
            QuestionKind::FreeText => lanyard_api::QuestionKind::FreeText,
        }
    }
}

impl From<lanyard_api::QuestionKind> for QuestionKind {
    fn from(kind: lanyard_api::QuestionKind) -> Self {
        match kind {
            lanyard_api::QuestionKind::MultipleChoice => QuestionKind::MultipleChoice,
            lanyard_api::QuestionKind::SingleChoice => QuestionKind::SingleChoice,
            lanyard_api::QuestionKind::YesNo => QuestionKind::YesNo,
            lanyard_api::QuestionKind::FreeText => QuestionKind::FreeText,
        }
    }
}

/// A question as the survey editor wants it, before ids and orders exist.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct QuestionDraft {
    pub text: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

impl From<QuestionDraft> for DesiredQuestion {
    fn from(draft: QuestionDraft) -> Self {
        DesiredQuestion {
            text: draft.text,
            kind: draft.kind.into(),
            required: draft.required,
            options: draft.options,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ReplaceQuestionsRequest {
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CreatedQuestionSummary {
    pub question_id: u64,
    pub option_ids: Vec<u64>,
}

impl From<&CreatedQuestion> for CreatedQuestionSummary {
    fn from(created: &CreatedQuestion) -> Self {
        Self {
            question_id: created.question_id,
            option_ids: created.option_ids.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ReplaceQuestionsResponse {
    pub created: Vec<CreatedQuestionSummary>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SurveyOption {
    pub id: u64,
    pub seq: u32,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SurveyQuestion {
    pub id: u64,
    pub text: String,
    pub kind: QuestionKind,
    pub order: u32,
    pub required: bool,
    pub options: Vec<SurveyOption>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SurveyDetail {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub questions: Vec<SurveyQuestion>,
}

impl From<&lanyard_api::SurveyTree> for SurveyDetail {
    fn from(tree: &lanyard_api::SurveyTree) -> Self {
        Self {
            id: tree.id,
            name: tree.name.clone(),
            description: tree.description.clone(),
            questions: tree
                .questions
                .iter()
                .map(|question| SurveyQuestion {
                    id: question.id,
                    text: question.text.clone(),
                    kind: question.qtype.into(),
                    order: question.order,
                    required: question.required,
                    options: question
                        .options
                        .iter()
                        .map(|option| SurveyOption {
                            id: option.id,
                            seq: option.seq,
                            value: option.value.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct EventSummary {
    pub id: u64,
    pub name: String,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            name: event.name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SurveyDetailResponse {
    pub survey: SurveyDetail,
    pub event: EventSummary,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AttendanceReport {
    pub event_id: u64,
    pub total: u64,
    pub rows: Vec<ControlRow>,
}
