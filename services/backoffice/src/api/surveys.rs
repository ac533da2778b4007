//! Survey API handlers: full-tree replacement and a joined detail view.
use crate::api::bearer_token;
use crate::api::error::{ApiError, map_checkin_error};
use crate::api::types::{
    CreatedQuestionSummary, EventSummary, ReplaceQuestionsRequest, ReplaceQuestionsResponse,
    SurveyDetail, SurveyDetailResponse,
};
use crate::app::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use lanyard_api::SessionContext;
use lanyard_survey::DesiredQuestion;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct SurveyDetailQuery {
    /// Event the survey hangs off.
    event: u64,
}

#[utoipa::path(
    post,
    path = "/v1/surveys/{survey_id}/questions/replace",
    tag = "surveys",
    params(
        ("survey_id" = u64, Path, description = "Survey identifier")
    ),
    request_body = ReplaceQuestionsRequest,
    responses(
        (status = 200, description = "Every question replaced", body = ReplaceQuestionsResponse),
        (status = 207, description = "Replacement finished with per-question failures", body = ReplaceQuestionsResponse),
        (status = 401, description = "Missing credentials", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn replace_questions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(survey_id): Path<u64>,
    Json(body): Json<ReplaceQuestionsRequest>,
) -> Result<(StatusCode, Json<ReplaceQuestionsResponse>), ApiError> {
    let ctx = SessionContext::new(bearer_token(&headers)?);
    let desired: Vec<DesiredQuestion> = body.questions.into_iter().map(Into::into).collect();

    let summary = state.reconciler.reconcile(&ctx, survey_id, &desired).await;
    let outcome = if summary.is_success() {
        "complete"
    } else {
        "partial"
    };
    metrics::counter!("backoffice_survey_replacements_total", "outcome" => outcome).increment(1);
    tracing::info!(
        survey_id,
        created = summary.created.len(),
        errors = summary.errors.len(),
        "survey questions replaced"
    );

    let status = if summary.is_success() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    let response = ReplaceQuestionsResponse {
        created: summary.created.iter().map(CreatedQuestionSummary::from).collect(),
        errors: summary.errors,
    };
    Ok((status, Json(response)))
}

#[utoipa::path(
    get,
    path = "/v1/surveys/{survey_id}",
    tag = "surveys",
    params(
        ("survey_id" = u64, Path, description = "Survey identifier"),
        ("event" = u64, Query, description = "Event the survey hangs off")
    ),
    responses(
        (status = 200, description = "Survey tree joined with its event", body = SurveyDetailResponse),
        (status = 404, description = "Survey or event unknown", body = crate::api::types::ErrorResponse),
        (status = 502, description = "Events backend unreachable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn survey_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(survey_id): Path<u64>,
    Query(query): Query<SurveyDetailQuery>,
) -> Result<Json<SurveyDetailResponse>, ApiError> {
    let ctx = SessionContext::with_event(bearer_token(&headers)?, query.event);

    let (tree, event) = tokio::try_join!(
        state.client.survey_tree(&ctx, survey_id),
        state.client.get_event(&ctx, query.event),
    )
    .map_err(|err| map_checkin_error(err.into()))?;

    Ok(Json(SurveyDetailResponse {
        survey: SurveyDetail::from(&tree),
        event: EventSummary::from(&event),
    }))
}
