//! QR check-in API handlers.
//!
//! # Purpose
//! Drives the operator scan flow over HTTP: scan resolves and
//! cross-validates a badge and parks the result in a scan session, confirm
//! submits the control record, delete cancels before submission.
//!
//! # Key invariants
//! - Nothing is written to the events backend before confirm.
//! - A failed scan leaves no session behind; there is nothing to confirm.
//! - Cancellation is allowed strictly before submission starts.
use crate::api::bearer_token;
use crate::api::error::{
    ApiError, api_conflict, api_internal_message, api_not_found, map_checkin_error,
};
use crate::api::types::{AttendeeSummary, ConfirmResponse, ControlRow, ScanRequest, ScanResponse};
use crate::app::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use lanyard_api::SessionContext;
use lanyard_checkin::{ScanSession, SessionError};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub(crate) struct ScanQuery {
    /// Event the operator station is working.
    event: u64,
}

fn session_fault(err: SessionError) -> ApiError {
    tracing::error!(error = %err, "scan session state walk failed");
    api_internal_message("scan session corrupted")
}

#[utoipa::path(
    post,
    path = "/v1/checkin/scan",
    tag = "checkin",
    params(
        ("event" = u64, Query, description = "Selected event identifier")
    ),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Attendee matched, awaiting confirmation", body = ScanResponse),
        (status = 400, description = "Malformed badge payload", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Attendee not found after scanning every page", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Badge or activity belongs to another event", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ScanQuery>,
    Json(body): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    let ctx = SessionContext::with_event(bearer_token(&headers)?, query.event);

    let mut session = ScanSession::new();
    session.start_scan().map_err(session_fault)?;

    let resolved = match state
        .resolver
        .resolve(&ctx, &body.payload, query.event, body.activity_id)
        .await
    {
        Ok(resolved) => resolved,
        Err(err) => {
            metrics::counter!("backoffice_scans_total", "outcome" => "rejected").increment(1);
            return Err(map_checkin_error(err));
        }
    };

    let attendee = AttendeeSummary::from(&resolved.attendee);
    session.matched(resolved).map_err(session_fault)?;
    session.await_confirmation().map_err(session_fault)?;
    let phase = session.phase().into();
    let session_id = state.sessions.insert(session);

    metrics::counter!("backoffice_scans_total", "outcome" => "matched").increment(1);
    tracing::info!(%session_id, attendee_id = attendee.id, event_id = query.event, "badge matched");
    Ok(Json(ScanResponse {
        session_id,
        phase,
        attendee,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/checkin/sessions/{session_id}/confirm",
    tag = "checkin",
    params(
        ("session_id" = Uuid, Path, description = "Scan session identifier")
    ),
    responses(
        (status = 200, description = "Control record created", body = ConfirmResponse),
        (status = 404, description = "Session unknown or expired", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Session not awaiting confirmation, or the backend rejected the submission", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn confirm(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    let ctx = SessionContext::new(bearer_token(&headers)?);

    // Move to Submitting under the entry lock and take a copy of the
    // resolved attendee; the remote call happens outside the lock.
    let begun = state.sessions.with_session(&session_id, |session| {
        session
            .begin_submit()
            .map(|_| session.resolved().cloned())
    });
    let resolved = match begun {
        None => return Err(api_not_found("scan session not found or expired")),
        Some(Err(_)) => {
            return Err(api_conflict(
                "not_awaiting_confirmation",
                "session is not awaiting confirmation",
            ));
        }
        Some(Ok(None)) => return Err(api_internal_message("scan session lost its attendee")),
        Some(Ok(Some(resolved))) => resolved,
    };

    match state.resolver.submit(&ctx, &resolved).await {
        Ok(record) => {
            state.sessions.with_session(&session_id, |session| {
                let _ = session.complete();
            });
            metrics::counter!("backoffice_checkins_total", "outcome" => "success").increment(1);
            tracing::info!(
                %session_id,
                control_id = record.id,
                attendee_id = record.attendee_id,
                "check-in registered"
            );
            Ok(Json(ConfirmResponse {
                phase: lanyard_checkin::ScanPhase::Success.into(),
                control: ControlRow::from(&record),
            }))
        }
        Err(err) => {
            state.sessions.with_session(&session_id, |session| {
                let _ = session.fail();
            });
            metrics::counter!("backoffice_checkins_total", "outcome" => "failed").increment(1);
            Err(map_checkin_error(err))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/v1/checkin/sessions/{session_id}",
    tag = "checkin",
    params(
        ("session_id" = Uuid, Path, description = "Scan session identifier")
    ),
    responses(
        (status = 204, description = "Session cancelled"),
        (status = 404, description = "Session unknown or expired", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Submission already started", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn cancel(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    bearer_token(&headers)?;

    let cancelled = state
        .sessions
        .with_session(&session_id, |session| session.cancel());
    match cancelled {
        None => Err(api_not_found("scan session not found or expired")),
        Some(Err(_)) => Err(api_conflict(
            "submission_in_progress",
            "session can no longer be cancelled",
        )),
        Some(Ok(())) => {
            state.sessions.remove(&session_id);
            tracing::info!(%session_id, "scan session cancelled");
            Ok(StatusCode::NO_CONTENT)
        }
    }
}
