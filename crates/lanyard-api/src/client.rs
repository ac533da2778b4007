use crate::error::{ApiError, ApiResult};
use crate::model::{
    Activity, Attendee, ControlRecord, ControlSubmission, Event, Question, QuestionKind,
    QuestionOption, SurveyTree,
};
use crate::page::{Page, PageEnvelope};
use crate::session::SessionContext;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Client for the events backend REST API.
///
/// One instance per process is enough; `reqwest::Client` pools connections
/// internally and the struct is cheap to clone.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct QuestionCreateRequest<'a> {
    survey: u64,
    order: u32,
    text: &'a str,
    qtype: QuestionKind,
    required: bool,
}

#[derive(Serialize)]
struct OptionCreateRequest<'a> {
    question: u64,
    seq: u32,
    value: &'a str,
}

impl BackendClient {
    pub fn new(base_url: String) -> Self {
        Self::with_http(base_url, reqwest::Client::new())
    }

    // For callers that tune timeouts or proxies on the reqwest client.
    pub fn with_http(base_url: String, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_attendees(
        &self,
        ctx: &SessionContext,
        page: u32,
        page_size: u32,
        event: Option<u64>,
    ) -> ApiResult<Page<Attendee>> {
        let mut path = format!("/attendees?page={page}&page_size={page_size}");
        if let Some(event) = event {
            path.push_str(&format!("&event={event}"));
        }
        let envelope: PageEnvelope<Attendee> = self.get_json(ctx, &path).await?;
        Ok(envelope.into())
    }

    pub async fn list_controls(
        &self,
        ctx: &SessionContext,
        page: u32,
        page_size: u32,
        event: Option<u64>,
    ) -> ApiResult<Page<ControlRecord>> {
        let mut path = format!("/controls?page={page}&page_size={page_size}");
        if let Some(event) = event {
            path.push_str(&format!("&event={event}"));
        }
        let envelope: PageEnvelope<ControlRecord> = self.get_json(ctx, &path).await?;
        Ok(envelope.into())
    }

    pub async fn get_event(&self, ctx: &SessionContext, event_id: u64) -> ApiResult<Event> {
        self.get_json(ctx, &format!("/events/{event_id}/")).await
    }

    pub async fn get_activity(
        &self,
        ctx: &SessionContext,
        activity_id: u64,
    ) -> ApiResult<Activity> {
        self.get_json(ctx, &format!("/activities/{activity_id}/"))
            .await
    }

    /// Register a control record for a resolved attendee.
    ///
    /// The backend signals duplicate registrations with a 2xx response whose
    /// body lacks the created control id, not with an error status; that
    /// shape comes back as [`ApiError::Rejected`].
    pub async fn submit_control(
        &self,
        ctx: &SessionContext,
        submission: &ControlSubmission,
    ) -> ApiResult<ControlRecord> {
        let url = format!("{}/controls/register/", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(&ctx.token)
            .json(submission)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }
        let value: serde_json::Value = serde_json::from_str(&body)?;
        if value.get("id").and_then(|id| id.as_u64()).is_none() {
            let detail = extract_detail(&body);
            return Err(ApiError::Rejected(if detail.is_empty() {
                "response missing created control id".to_string()
            } else {
                detail
            }));
        }
        serde_json::from_str(&body).map_err(ApiError::from)
    }

    pub async fn survey_tree(&self, ctx: &SessionContext, survey_id: u64) -> ApiResult<SurveyTree> {
        self.get_json(ctx, &format!("/surveys/{survey_id}/questions"))
            .await
    }

    pub async fn delete_question(&self, ctx: &SessionContext, question_id: u64) -> ApiResult<()> {
        let url = format!("{}/survey-questions/{question_id}/", self.base_url);
        let response = self
            .http
            .delete(url)
            .bearer_auth(&ctx.token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }
        Ok(())
    }

    pub async fn create_question(
        &self,
        ctx: &SessionContext,
        survey: u64,
        order: u32,
        text: &str,
        qtype: QuestionKind,
        required: bool,
    ) -> ApiResult<Question> {
        self.post_json(
            ctx,
            "/survey-questions/",
            &QuestionCreateRequest {
                survey,
                order,
                text,
                qtype,
                required,
            },
        )
        .await
    }

    pub async fn create_option(
        &self,
        ctx: &SessionContext,
        question: u64,
        seq: u32,
        value: &str,
    ) -> ApiResult<QuestionOption> {
        self.post_json(
            ctx,
            "/survey-options/",
            &OptionCreateRequest {
                question,
                seq,
                value,
            },
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &SessionContext,
        path: &str,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(url).bearer_auth(&ctx.token).send().await?;
        decode_response(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        ctx: &SessionContext,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&ctx.token)
            .json(body)
            .send()
            .await?;
        decode_response(response).await
    }
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            detail: extract_detail(&body),
        });
    }
    serde_json::from_str(&body).map_err(ApiError::from)
}

// Pull the human-readable message out of a backend error body. Falls back to
// the raw body so collision markers survive unexpected shapes.
fn extract_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(detail) = value
            .get("detail")
            .or_else(|| value.get("message"))
            .and_then(|v| v.as_str())
    {
        return detail.to_string();
    }
    body.trim().to_string()
}
