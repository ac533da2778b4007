//! Back-office HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and testable.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::sessions::ScanSessionStore;
use axum::Router;
use lanyard_api::BackendClient;
use lanyard_checkin::CheckinResolver;
use lanyard_survey::SurveyReconciler;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub client: BackendClient,
    pub resolver: Arc<CheckinResolver>,
    pub reconciler: Arc<SurveyReconciler>,
    pub sessions: Arc<ScanSessionStore>,
    pub http: reqwest::Client,
    pub page_size: u32,
    pub api_version: String,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route(
            "/v1/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route("/v1/checkin/scan", axum::routing::post(api::checkin::scan))
        .route(
            "/v1/checkin/sessions/:session_id/confirm",
            axum::routing::post(api::checkin::confirm),
        )
        .route(
            "/v1/checkin/sessions/:session_id",
            axum::routing::delete(api::checkin::cancel),
        )
        .route(
            "/v1/surveys/:survey_id",
            axum::routing::get(api::surveys::survey_detail),
        )
        .route(
            "/v1/surveys/:survey_id/questions/replace",
            axum::routing::post(api::surveys::replace_questions),
        )
        .route(
            "/v1/reports/attendance",
            axum::routing::get(api::reports::attendance_report),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}
