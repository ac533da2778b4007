//! Integration tests for the events backend client against a local fake.
//!
//! # Purpose
//! Pin the wire contract: bearer auth on every call, envelope-vs-array
//! normalization, the duplicate-control rejection shape, and the unique-order
//! rejection on question creation.
//!
//! # Key invariants
//! - The fake binds to 127.0.0.1:0 so tests stay isolated and deterministic.
//! - Handlers reject requests without the expected bearer token.
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use lanyard_api::{ApiError, BackendClient, ControlSubmission, QuestionKind, SessionContext};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;

const TOKEN: &str = "test-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

async fn list_attendees(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "no token"}))).into_response();
    }
    let page = params
        .get("page")
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(1);
    let event = params.get("event").map(String::as_str);
    if event == Some("99") {
        // Filtered listing comes back as a bare array.
        return Json(json!([])).into_response();
    }
    match page {
        1 => Json(json!({
            "results": [
                {"id": 1, "name": "Ana Ruiz", "email": "ana@expo.mx", "event": 7},
                {"id": 2, "name": "Ben Ortiz", "email": "ben@expo.mx", "event": 7}
            ],
            "count": 3,
            "total_pages": 2,
            "next": "/attendees?page=2"
        }))
        .into_response(),
        // Later pages use the bare-array shape some deployments return.
        _ => Json(json!([
            {"id": 3, "name": "Cruz Vega", "email": "cruz@expo.mx", "event": 7}
        ]))
        .into_response(),
    }
}

async fn register_control(
    headers: HeaderMap,
    Json(body): Json<ControlSubmission>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "no token"}))).into_response();
    }
    match body.attendee_id {
        // Duplicate registrations answer 200 with no created id.
        2 => Json(json!({"detail": "attendee already registered"})).into_response(),
        _ => Json(json!({
            "id": 500,
            "attendee_id": body.attendee_id,
            "event_id": body.event_id,
            "activity_id": body.activity_id,
            "attendee_email": body.attendee_email,
            "created_date": "2026-03-14",
            "created_time": "10:22:03"
        }))
        .into_response(),
    }
}

async fn survey_tree(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "no token"}))).into_response();
    }
    Json(json!({
        "id": 5,
        "name": "Feedback",
        "description": "end of day",
        "questions": [
            {"id": 31, "text": "Rate the talk", "qtype": "single_choice", "order": 1,
             "options": [{"id": 310, "seq": 1, "value": "Good"}]},
            {"id": 32, "text": "Comments", "qtype": "free_text", "order": 2, "options": []}
        ]
    }))
    .into_response()
}

async fn create_question(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    let order = body["order"].as_u64().unwrap_or(0);
    if order == 1 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "unique constraint (survey, order) violated"})),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "id": 40,
            "text": body["text"],
            "qtype": body["qtype"],
            "order": order,
            "required": body["required"],
            "options": []
        })),
    )
        .into_response()
}

async fn create_option(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(json!({"id": 71, "seq": body["seq"], "value": body["value"]})),
    )
}

async fn serve_backend() -> SocketAddr {
    let app = Router::new()
        .route("/attendees", get(list_attendees))
        .route("/controls/register/", post(register_control))
        .route("/surveys/5/questions", get(survey_tree))
        .route("/survey-questions/", post(create_question))
        .route(
            "/survey-questions/:id/",
            delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route("/survey-options/", post(create_option))
        .route(
            "/events/7/",
            get(|| async { Json(json!({"id": 7, "name": "Expo 2026"})) }),
        )
        .route(
            "/activities/3/",
            get(|| async { Json(json!({"id": 3, "event": 7, "name": "Keynote"})) }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });
    addr
}

fn ctx() -> SessionContext {
    SessionContext::new(TOKEN)
}

#[tokio::test]
async fn attendee_pages_normalize_both_shapes() {
    let addr = serve_backend().await;
    let client = BackendClient::new(format!("http://{addr}"));

    let first = client
        .list_attendees(&ctx(), 1, 2, None)
        .await
        .expect("page 1");
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.count, Some(3));
    assert_eq!(first.total_pages, Some(2));
    assert!(first.has_more(1, 2));

    let second = client
        .list_attendees(&ctx(), 2, 2, None)
        .await
        .expect("page 2");
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.count, None);
    assert!(!second.has_more(2, 2));
}

#[tokio::test]
async fn event_filter_reaches_the_backend() {
    let addr = serve_backend().await;
    let client = BackendClient::new(format!("http://{addr}"));
    let page = client
        .list_attendees(&ctx(), 1, 100, Some(99))
        .await
        .expect("filtered");
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn missing_token_is_a_status_error() {
    let addr = serve_backend().await;
    let client = BackendClient::new(format!("http://{addr}"));
    let err = client
        .list_attendees(&SessionContext::new("wrong"), 1, 100, None)
        .await
        .expect_err("unauthorized");
    match err {
        ApiError::Status { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail, "no token");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn submit_control_returns_created_record() {
    let addr = serve_backend().await;
    let client = BackendClient::new(format!("http://{addr}"));
    let record = client
        .submit_control(
            &ctx(),
            &ControlSubmission {
                attendee_id: 1,
                event_id: 7,
                activity_id: 3,
                attendee_email: "ana@expo.mx".to_string(),
            },
        )
        .await
        .expect("created");
    assert_eq!(record.id, 500);
    assert_eq!(record.created_date.as_deref(), Some("2026-03-14"));
}

#[tokio::test]
async fn duplicate_control_is_rejected_not_ok() {
    let addr = serve_backend().await;
    let client = BackendClient::new(format!("http://{addr}"));
    let err = client
        .submit_control(
            &ctx(),
            &ControlSubmission {
                attendee_id: 2,
                event_id: 7,
                activity_id: 3,
                attendee_email: "ben@expo.mx".to_string(),
            },
        )
        .await
        .expect_err("duplicate");
    match err {
        ApiError::Rejected(detail) => assert_eq!(detail, "attendee already registered"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn survey_endpoints_round_trip() {
    let addr = serve_backend().await;
    let client = BackendClient::new(format!("http://{addr}"));

    let tree = client.survey_tree(&ctx(), 5).await.expect("tree");
    assert_eq!(tree.questions.len(), 2);
    assert_eq!(tree.questions[0].options[0].value, "Good");

    client.delete_question(&ctx(), 31).await.expect("delete");

    let err = client
        .create_question(&ctx(), 5, 1, "Rate the talk", QuestionKind::SingleChoice, true)
        .await
        .expect_err("colliding order");
    assert!(lanyard_api::is_order_collision(&err));

    let question = client
        .create_question(&ctx(), 5, 3, "Rate the talk", QuestionKind::SingleChoice, true)
        .await
        .expect("created");
    assert_eq!(question.order, 3);

    let option = client
        .create_option(&ctx(), question.id, 1, "Good")
        .await
        .expect("option");
    assert_eq!(option.seq, 1);
}

#[tokio::test]
async fn event_and_activity_lookups_decode() {
    let addr = serve_backend().await;
    let client = BackendClient::new(format!("http://{addr}"));
    let event = client.get_event(&ctx(), 7).await.expect("event");
    assert_eq!(event.name, "Expo 2026");
    let activity = client.get_activity(&ctx(), 3).await.expect("activity");
    assert_eq!(activity.event, 7);
}
