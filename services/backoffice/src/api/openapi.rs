//! OpenAPI schema aggregation for the back-office API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for
//! docs and client generation.
use crate::api::{
    checkin, reports, surveys, system,
    types::{
        AttendanceReport, AttendeeSummary, ConfirmResponse, ControlRow, CreatedQuestionSummary,
        ErrorResponse, EventSummary, HealthStatus, QuestionDraft, QuestionKind,
        ReplaceQuestionsRequest, ReplaceQuestionsResponse, ScanRequest, ScanResponse,
        SessionPhase, SurveyDetail, SurveyDetailResponse, SurveyOption, SurveyQuestion,
        SystemInfo,
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "lanyard-backoffice",
        version = "v1",
        description = "Event back-office HTTP API: QR check-in and survey maintenance"
    ),
    paths(
        system::system_info,
        system::system_health,
        checkin::scan,
        checkin::confirm,
        checkin::cancel,
        surveys::replace_questions,
        surveys::survey_detail,
        reports::attendance_report
    ),
    components(schemas(
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        ScanRequest,
        ScanResponse,
        SessionPhase,
        AttendeeSummary,
        ConfirmResponse,
        ControlRow,
        QuestionKind,
        QuestionDraft,
        ReplaceQuestionsRequest,
        ReplaceQuestionsResponse,
        CreatedQuestionSummary,
        SurveyOption,
        SurveyQuestion,
        SurveyDetail,
        EventSummary,
        SurveyDetailResponse,
        AttendanceReport
    )),
    tags(
        (name = "system", description = "System and discovery endpoints"),
        (name = "checkin", description = "QR badge check-in flow"),
        (name = "surveys", description = "Survey question maintenance"),
        (name = "reports", description = "Attendance reporting")
    )
)]
pub struct ApiDoc;
