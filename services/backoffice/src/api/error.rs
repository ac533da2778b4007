//! API error types and helpers.
//!
//! # Purpose
//! Centralizes HTTP error construction so every endpoint returns the same
//! `{code, message, request_id}` shape, and maps the check-in taxonomy onto
//! HTTP statuses in exactly one place.
use crate::api::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use lanyard_checkin::CheckinError;

/// Structured API error returned by handlers.
///
/// Couples an HTTP status code with a JSON error body; `status` must match
/// the semantics of `body.code`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn build(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

pub fn api_unauthorized(message: &str) -> ApiError {
    build(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

pub fn api_not_found(message: &str) -> ApiError {
    build(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 409 Conflict error with a caller-provided code for precise
/// client handling.
pub fn api_conflict(code: &str, message: &str) -> ApiError {
    build(StatusCode::CONFLICT, code, message)
}

pub fn api_validation_error(message: &str) -> ApiError {
    build(StatusCode::BAD_REQUEST, "validation_error", message)
}

pub fn api_internal_message(message: &str) -> ApiError {
    build(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Build a 502 for an unreachable or misbehaving events backend.
pub fn api_bad_gateway(message: &str) -> ApiError {
    build(StatusCode::BAD_GATEWAY, "upstream_unreachable", message)
}

/// Map a check-in failure onto the HTTP surface.
///
/// Parse and cross-validation failures are client errors; transport
/// failures are gateway errors; backend rejections keep their detail so the
/// operator sees what the platform said.
pub fn map_checkin_error(err: CheckinError) -> ApiError {
    match err {
        CheckinError::MalformedPayload(parse) => build(
            StatusCode::BAD_REQUEST,
            "malformed_payload",
            &parse.to_string(),
        ),
        CheckinError::AttendeeNotFound { .. } => {
            build(StatusCode::NOT_FOUND, "attendee_not_found", &err.to_string())
        }
        CheckinError::EventMismatch { .. } => {
            build(StatusCode::CONFLICT, "event_mismatch", &err.to_string())
        }
        CheckinError::ActivityMismatch { .. } => {
            build(StatusCode::CONFLICT, "activity_mismatch", &err.to_string())
        }
        CheckinError::Network(transport) => {
            tracing::warn!(error = %transport, "events backend unreachable");
            api_bad_gateway("events backend unreachable")
        }
        CheckinError::RemoteRejected(remote) => map_remote_rejection(remote),
    }
}

fn map_remote_rejection(err: lanyard_api::ApiError) -> ApiError {
    match err {
        lanyard_api::ApiError::Status { status: 404, detail } => {
            build(StatusCode::NOT_FOUND, "not_found", &detail)
        }
        lanyard_api::ApiError::Rejected(detail) => {
            build(StatusCode::CONFLICT, "rejected", &detail)
        }
        other => {
            tracing::warn!(error = %other, "events backend rejected the request");
            build(
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                &other.to_string(),
            )
        }
    }
}
