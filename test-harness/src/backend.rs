//! In-memory events backend behind a real Axum listener.
//!
//! State is plain `HashMap`s and `Vec`s guarded by `tokio::sync::RwLock`:
//! reads are concurrent, mutations take a write lock, and everything is lost
//! when the handle drops. Tests seed records up front, point a
//! `BackendClient` at `RunningBackend::base_url`, and read the recorders
//! back afterwards.
//!
//! The quirks worth knowing about, all copied from the live platform:
//! - listing endpoints paginate in several envelope shapes (`PageStyle`)
//! - deleting a question is a soft delete that keeps its `order` reserved
//! - re-submitting a control answers 200 with a detail body and no `id`

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use lanyard_api::{
    Activity, Attendee, ControlRecord, ControlSubmission, Event, Question, QuestionKind,
    QuestionOption, SurveyTree,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tokio::net::TcpListener;
use tokio::sync::{RwLock, oneshot};
use tokio::task::JoinHandle;

use crate::http::{spawn_axum_with_shutdown, wait_for_listen};

/// Which pagination metadata the listing endpoints expose. The live platform
/// has shipped every one of these shapes at some point, so consumers have to
/// cope with all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStyle {
    /// `results` plus `count`, `total_pages`, and a `next` link.
    Full,
    /// `results` plus `count` only.
    CountOnly,
    /// `results` plus a `next` link only.
    NextOnly,
    /// A bare JSON array, no envelope at all.
    Bare,
}

#[derive(Debug, Default)]
struct SurveyState {
    trees: HashMap<u64, SurveyTree>,
    // Orders burned by soft-deleted questions. The platform's unique
    // (survey, order) index still counts those rows.
    retired_orders: HashMap<u64, HashSet<u32>>,
    deleted: Vec<u64>,
}

#[derive(Debug)]
struct BackendState {
    token: String,
    page_style: RwLock<PageStyle>,
    attendees: RwLock<Vec<Attendee>>,
    events: RwLock<HashMap<u64, Event>>,
    activities: RwLock<HashMap<u64, Activity>>,
    controls: RwLock<Vec<ControlRecord>>,
    surveys: RwLock<SurveyState>,
    tree_outages: AtomicU32,
    failing_deletes: RwLock<HashSet<u64>>,
    poisoned_options: RwLock<HashSet<String>>,
    next_id: AtomicU64,
}

impl BackendState {
    fn alloc_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

/// Seedable fake of the events platform. Clones share state.
#[derive(Clone)]
pub struct EventsBackend {
    state: Arc<BackendState>,
}

impl EventsBackend {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            state: Arc::new(BackendState {
                token: token.into(),
                page_style: RwLock::new(PageStyle::Full),
                attendees: RwLock::new(Vec::new()),
                events: RwLock::new(HashMap::new()),
                activities: RwLock::new(HashMap::new()),
                controls: RwLock::new(Vec::new()),
                surveys: RwLock::new(SurveyState::default()),
                tree_outages: AtomicU32::new(0),
                failing_deletes: RwLock::new(HashSet::new()),
                poisoned_options: RwLock::new(HashSet::new()),
                // Ids allocated here never collide with small seeded ids.
                next_id: AtomicU64::new(1000),
            }),
        }
    }

    pub async fn set_page_style(&self, style: PageStyle) {
        *self.state.page_style.write().await = style;
    }

    pub async fn seed_event(&self, event: Event) {
        self.state.events.write().await.insert(event.id, event);
    }

    pub async fn seed_activity(&self, activity: Activity) {
        self.state
            .activities
            .write()
            .await
            .insert(activity.id, activity);
    }

    pub async fn seed_attendee(&self, attendee: Attendee) {
        self.state.attendees.write().await.push(attendee);
    }

    pub async fn seed_control(&self, record: ControlRecord) {
        self.state.controls.write().await.push(record);
    }

    pub async fn seed_survey(&self, tree: SurveyTree) {
        self.state.surveys.write().await.trees.insert(tree.id, tree);
    }

    /// Reserves orders as if questions at those positions had been deleted in
    /// the past.
    pub async fn retire_orders(&self, survey_id: u64, orders: impl IntoIterator<Item = u32>) {
        self.state
            .surveys
            .write()
            .await
            .retired_orders
            .entry(survey_id)
            .or_default()
            .extend(orders);
    }

    /// The next `count` question-tree fetches answer 500.
    pub fn fail_next_tree_fetches(&self, count: u32) {
        self.state.tree_outages.store(count, Ordering::SeqCst);
    }

    /// Deleting this question answers 500 from now on.
    pub async fn fail_delete_of(&self, question_id: u64) {
        self.state.failing_deletes.write().await.insert(question_id);
    }

    /// Creating an option with this exact value answers 500 from now on.
    pub async fn poison_option_value(&self, value: impl Into<String>) {
        self.state.poisoned_options.write().await.insert(value.into());
    }

    /// All control records, seeded and registered, in insertion order.
    pub async fn submissions(&self) -> Vec<ControlRecord> {
        self.state.controls.read().await.clone()
    }

    /// Question ids soft-deleted through the API, in deletion order.
    pub async fn deleted_question_ids(&self) -> Vec<u64> {
        self.state.surveys.read().await.deleted.clone()
    }

    /// Live questions of one survey, in creation order.
    pub async fn live_questions(&self, survey_id: u64) -> Vec<Question> {
        self.state
            .surveys
            .read()
            .await
            .trees
            .get(&survey_id)
            .map(|tree| tree.questions.clone())
            .unwrap_or_default()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/attendees", get(list_attendees))
            .route("/controls", get(list_controls))
            .route("/controls/register/", post(register_control))
            .route("/events/:event_id/", get(get_event))
            .route("/activities/:activity_id/", get(get_activity))
            .route("/surveys/:survey_id/questions", get(survey_tree))
            .route("/survey-questions/", post(create_question))
            .route("/survey-questions/:question_id/", delete(delete_question))
            .route("/survey-options/", post(create_option))
            .with_state(self.state.clone())
    }

    /// Binds an ephemeral local port, serves the router on it, and waits for
    /// the listener to accept before returning.
    pub async fn spawn(&self) -> Result<RunningBackend> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind backend listener")?;
        let addr = listener.local_addr().context("read backend listen addr")?;
        let (shutdown, handle) = spawn_axum_with_shutdown(listener, self.router());
        wait_for_listen(addr).await?;
        Ok(RunningBackend {
            addr,
            shutdown: Some(shutdown),
            handle: Some(handle),
        })
    }
}

/// A backend serving on an ephemeral port. Dropping it stops the server.
pub struct RunningBackend {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RunningBackend {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops the server and waits for the serve task to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for RunningBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn require_token(state: &BackendState, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", state.token);
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if presented == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(detail(StatusCode::UNAUTHORIZED, "invalid or missing token"))
    }
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

#[derive(Debug, Deserialize)]
struct ListingQuery {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
    event: Option<u64>,
}

fn first_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    lanyard_api::DEFAULT_PAGE_SIZE
}

/// Renders one page of `items` in the requested envelope shape.
fn page_body<T: Serialize>(items: &[T], query: &ListingQuery, style: PageStyle, path: &str) -> Value {
    let page = query.page.max(1) as usize;
    let page_size = query.page_size.max(1) as usize;
    let start = (page - 1) * page_size;
    let slice: Vec<&T> = items.iter().skip(start).take(page_size).collect();
    let count = items.len() as u64;
    let total_pages = items.len().div_ceil(page_size).max(1) as u32;
    let next = (start + page_size < items.len())
        .then(|| format!("{path}?page={}&page_size={page_size}", page + 1));
    match style {
        PageStyle::Bare => json!(slice),
        PageStyle::Full => json!({
            "results": slice,
            "count": count,
            "total_pages": total_pages,
            "next": next,
        }),
        PageStyle::CountOnly => json!({ "results": slice, "count": count }),
        PageStyle::NextOnly => json!({ "results": slice, "next": next }),
    }
}

async fn list_attendees(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<ListingQuery>,
) -> Response {
    if let Err(denied) = require_token(&state, &headers) {
        return denied;
    }
    let attendees = state.attendees.read().await;
    let filtered: Vec<Attendee> = attendees
        .iter()
        .filter(|attendee| query.event.is_none_or(|event| attendee.event == event))
        .cloned()
        .collect();
    let style = *state.page_style.read().await;
    Json(page_body(&filtered, &query, style, "/attendees")).into_response()
}

async fn list_controls(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<ListingQuery>,
) -> Response {
    if let Err(denied) = require_token(&state, &headers) {
        return denied;
    }
    let controls = state.controls.read().await;
    let filtered: Vec<ControlRecord> = controls
        .iter()
        .filter(|record| query.event.is_none_or(|event| record.event_id == event))
        .cloned()
        .collect();
    let style = *state.page_style.read().await;
    Json(page_body(&filtered, &query, style, "/controls")).into_response()
}

async fn get_event(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(event_id): Path<u64>,
) -> Response {
    if let Err(denied) = require_token(&state, &headers) {
        return denied;
    }
    match state.events.read().await.get(&event_id) {
        Some(event) => Json(event.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "event not found"),
    }
}

async fn get_activity(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(activity_id): Path<u64>,
) -> Response {
    if let Err(denied) = require_token(&state, &headers) {
        return denied;
    }
    match state.activities.read().await.get(&activity_id) {
        Some(activity) => Json(activity.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "activity not found"),
    }
}

async fn register_control(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(submission): Json<ControlSubmission>,
) -> Response {
    if let Err(denied) = require_token(&state, &headers) {
        return denied;
    }
    let mut controls = state.controls.write().await;
    let duplicate = controls.iter().any(|record| {
        record.attendee_id == submission.attendee_id
            && record.activity_id == submission.activity_id
    });
    if duplicate {
        // The platform answers duplicates with 200 and a human-readable body.
        // The missing `id` is the only reliable tell.
        return detail(StatusCode::OK, "attendee already registered for this activity");
    }
    let now = chrono::Utc::now();
    let record = ControlRecord {
        id: state.alloc_id(),
        attendee_id: submission.attendee_id,
        event_id: submission.event_id,
        activity_id: submission.activity_id,
        attendee_email: submission.attendee_email,
        created_date: Some(now.format("%Y-%m-%d").to_string()),
        created_time: Some(now.format("%H:%M:%S").to_string()),
    };
    controls.push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn survey_tree(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(survey_id): Path<u64>,
) -> Response {
    if let Err(denied) = require_token(&state, &headers) {
        return denied;
    }
    let outage = state
        .tree_outages
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok();
    if outage {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "survey service unavailable");
    }
    match state.surveys.read().await.trees.get(&survey_id) {
        Some(tree) => Json(tree.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "survey not found"),
    }
}

async fn delete_question(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(question_id): Path<u64>,
) -> Response {
    if let Err(denied) = require_token(&state, &headers) {
        return denied;
    }
    if state.failing_deletes.read().await.contains(&question_id) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "question delete failed");
    }
    let mut guard = state.surveys.write().await;
    let SurveyState {
        trees,
        retired_orders,
        deleted,
    } = &mut *guard;
    for tree in trees.values_mut() {
        if let Some(index) = tree
            .questions
            .iter()
            .position(|question| question.id == question_id)
        {
            let question = tree.questions.remove(index);
            retired_orders.entry(tree.id).or_default().insert(question.order);
            deleted.push(question_id);
            return StatusCode::NO_CONTENT.into_response();
        }
    }
    detail(StatusCode::NOT_FOUND, "question not found")
}

#[derive(Debug, Deserialize)]
struct QuestionCreate {
    survey: u64,
    order: u32,
    text: String,
    qtype: QuestionKind,
    #[serde(default)]
    required: bool,
}

async fn create_question(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<QuestionCreate>,
) -> Response {
    if let Err(denied) = require_token(&state, &headers) {
        return denied;
    }
    let mut guard = state.surveys.write().await;
    let order_taken = guard
        .retired_orders
        .get(&body.survey)
        .is_some_and(|orders| orders.contains(&body.order))
        || guard.trees.get(&body.survey).is_some_and(|tree| {
            tree.questions
                .iter()
                .any(|question| question.order == body.order)
        });
    if order_taken {
        return detail(
            StatusCode::BAD_REQUEST,
            "unique constraint (survey, order) violated",
        );
    }
    let question = Question {
        id: state.alloc_id(),
        text: body.text,
        qtype: body.qtype,
        order: body.order,
        required: body.required,
        options: Vec::new(),
    };
    let tree = guard.trees.entry(body.survey).or_insert_with(|| SurveyTree {
        id: body.survey,
        name: format!("survey {}", body.survey),
        description: None,
        questions: Vec::new(),
    });
    tree.questions.push(question.clone());
    (StatusCode::CREATED, Json(question)).into_response()
}

#[derive(Debug, Deserialize)]
struct OptionCreate {
    question: u64,
    seq: u32,
    value: String,
}

async fn create_option(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<OptionCreate>,
) -> Response {
    if let Err(denied) = require_token(&state, &headers) {
        return denied;
    }
    if state.poisoned_options.read().await.contains(&body.value) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "option create failed");
    }
    let mut guard = state.surveys.write().await;
    for tree in guard.trees.values_mut() {
        if let Some(question) = tree
            .questions
            .iter_mut()
            .find(|question| question.id == body.question)
        {
            let option = QuestionOption {
                id: state.alloc_id(),
                seq: body.seq,
                value: body.value,
            };
            question.options.push(option.clone());
            return (StatusCode::CREATED, Json(option)).into_response();
        }
    }
    detail(StatusCode::NOT_FOUND, "question not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_test_client;

    fn listing(page: u32, page_size: u32) -> ListingQuery {
        ListingQuery {
            page,
            page_size,
            event: None,
        }
    }

    #[test]
    fn page_body_renders_each_style() {
        let items = vec![1, 2, 3, 4, 5];

        let full = page_body(&items, &listing(1, 2), PageStyle::Full, "/attendees");
        assert_eq!(full["results"], json!([1, 2]));
        assert_eq!(full["count"], json!(5));
        assert_eq!(full["total_pages"], json!(3));
        assert_eq!(full["next"], json!("/attendees?page=2&page_size=2"));

        let count_only = page_body(&items, &listing(3, 2), PageStyle::CountOnly, "/attendees");
        assert_eq!(count_only["results"], json!([5]));
        assert_eq!(count_only["count"], json!(5));
        assert!(count_only.get("next").is_none());

        let next_only = page_body(&items, &listing(3, 2), PageStyle::NextOnly, "/attendees");
        assert_eq!(next_only["next"], Value::Null);

        let bare = page_body(&items, &listing(2, 2), PageStyle::Bare, "/attendees");
        assert_eq!(bare, json!([3, 4]));
    }

    #[tokio::test]
    async fn rejects_requests_without_the_token() {
        let backend = EventsBackend::new("secret");
        let running = backend.spawn().await.expect("spawn backend");
        let client = build_test_client().expect("client");

        let anonymous = client
            .get(format!("{}/attendees", running.base_url()))
            .send()
            .await
            .expect("request");
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let authorized = client
            .get(format!("{}/attendees", running.base_url()))
            .bearer_auth("secret")
            .send()
            .await
            .expect("request");
        assert_eq!(authorized.status(), StatusCode::OK);

        running.shutdown().await;
    }

    #[tokio::test]
    async fn duplicate_control_answers_ok_without_id() {
        let backend = EventsBackend::new("secret");
        let running = backend.spawn().await.expect("spawn backend");
        let client = build_test_client().expect("client");
        let submission = json!({
            "attendee_id": 8,
            "event_id": 2,
            "activity_id": 4,
            "attendee_email": "dora@expo.mx",
        });

        let first = client
            .post(format!("{}/controls/register/", running.base_url()))
            .bearer_auth("secret")
            .json(&submission)
            .send()
            .await
            .expect("request");
        assert_eq!(first.status(), StatusCode::CREATED);
        let record: Value = first.json().await.expect("body");
        assert!(record["id"].as_u64().is_some());

        let second = client
            .post(format!("{}/controls/register/", running.base_url()))
            .bearer_auth("secret")
            .json(&submission)
            .send()
            .await
            .expect("request");
        assert_eq!(second.status(), StatusCode::OK);
        let body: Value = second.json().await.expect("body");
        assert!(body.get("id").is_none());

        assert_eq!(backend.submissions().await.len(), 1);
        running.shutdown().await;
    }

    #[tokio::test]
    async fn soft_delete_keeps_the_order_reserved() {
        let backend = EventsBackend::new("secret");
        backend
            .seed_survey(SurveyTree {
                id: 5,
                name: "Feedback".into(),
                description: None,
                questions: vec![Question {
                    id: 31,
                    text: "Keep?".into(),
                    qtype: QuestionKind::YesNo,
                    order: 1,
                    required: false,
                    options: Vec::new(),
                }],
            })
            .await;
        let running = backend.spawn().await.expect("spawn backend");
        let client = build_test_client().expect("client");

        let deleted = client
            .delete(format!("{}/survey-questions/31/", running.base_url()))
            .bearer_auth("secret")
            .send()
            .await
            .expect("request");
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let collision = client
            .post(format!("{}/survey-questions/", running.base_url()))
            .bearer_auth("secret")
            .json(&json!({
                "survey": 5,
                "order": 1,
                "text": "New?",
                "qtype": "free_text",
                "required": false,
            }))
            .send()
            .await
            .expect("request");
        assert_eq!(collision.status(), StatusCode::BAD_REQUEST);
        let body: Value = collision.json().await.expect("body");
        assert_eq!(body["detail"], json!("unique constraint (survey, order) violated"));

        assert_eq!(backend.deleted_question_ids().await, vec![31]);
        running.shutdown().await;
    }
}
