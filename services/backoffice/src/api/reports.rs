//! Attendance report handler: collects every control record for an event.
use crate::api::bearer_token;
use crate::api::error::{ApiError, map_checkin_error};
use crate::api::types::{AttendanceReport, ControlRow};
use crate::app::AppState;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use lanyard_api::SessionContext;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct AttendanceQuery {
    /// Event to report on.
    event: u64,
}

#[utoipa::path(
    get,
    path = "/v1/reports/attendance",
    tag = "reports",
    params(
        ("event" = u64, Query, description = "Event to report on")
    ),
    responses(
        (status = 200, description = "Every control record for the event", body = AttendanceReport),
        (status = 401, description = "Missing credentials", body = crate::api::types::ErrorResponse),
        (status = 502, description = "Events backend unreachable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn attendance_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<AttendanceReport>, ApiError> {
    let ctx = SessionContext::with_event(bearer_token(&headers)?, query.event);
    let page_size = state.page_size;

    let first = state
        .client
        .list_controls(&ctx, 1, page_size, Some(query.event))
        .await
        .map_err(|err| map_checkin_error(err.into()))?;
    let mut rows: Vec<ControlRow> = first.items.iter().map(ControlRow::from).collect();

    if let Some(total_pages) = first.total_pages
        && total_pages > 1
    {
        // The page count is known up front, so the rest fetch concurrently.
        // Collecting in page order keeps rows in backend order.
        let fetches: Vec<_> = (2..=total_pages)
            .map(|page| {
                state
                    .client
                    .list_controls(&ctx, page, page_size, Some(query.event))
            })
            .collect();
        let pages = futures::future::try_join_all(fetches)
            .await
            .map_err(|err| map_checkin_error(err.into()))?;
        for page in &pages {
            rows.extend(page.items.iter().map(ControlRow::from));
        }
    } else {
        // No page count in the envelope; walk the has-more signals one
        // page at a time.
        let mut page = 1;
        let mut listing = first;
        while listing.has_more(page, page_size) {
            page += 1;
            listing = state
                .client
                .list_controls(&ctx, page, page_size, Some(query.event))
                .await
                .map_err(|err| map_checkin_error(err.into()))?;
            rows.extend(listing.items.iter().map(ControlRow::from));
        }
    }

    metrics::counter!("backoffice_reports_total").increment(1);
    tracing::info!(event_id = query.event, rows = rows.len(), "attendance report built");
    Ok(Json(AttendanceReport {
        event_id: query.event,
        total: rows.len() as u64,
        rows,
    }))
}
