//! System/health API handlers.
//!
//! # Purpose
//! Lightweight endpoints for service metadata and probes. Health reports
//! whether the remote events backend answers HTTP at all; per-request auth
//! failures are a separate concern.
use crate::api::error::{ApiError, api_bad_gateway};
use crate::api::types::{HealthStatus, SystemInfo};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/v1/system/info",
    tag = "system",
    responses(
        (status = 200, description = "Service identity and backend target", body = SystemInfo)
    )
)]
pub(crate) async fn system_info(State(state): State<AppState>) -> Json<SystemInfo> {
    Json(SystemInfo {
        service: "lanyard-backoffice".to_string(),
        api_version: state.api_version.clone(),
        backend_url: state.client.base_url().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Back-office health", body = HealthStatus),
        (status = 502, description = "Events backend unreachable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn system_health(
    State(state): State<AppState>,
) -> Result<Json<HealthStatus>, ApiError> {
    // Any HTTP answer proves the backend is reachable; the probe carries no
    // credentials, so a 401 here is still healthy.
    if let Err(err) = state.http.get(state.client.base_url()).send().await {
        tracing::warn!(error = %err, "events backend health probe failed");
        return Err(api_bad_gateway("events backend unreachable"));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
    }))
}
