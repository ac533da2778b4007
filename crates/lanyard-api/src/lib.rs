//! Typed client for the events backend REST API.
//!
//! # Purpose
//! Centralizes every remote call the back-office makes: attendee listings,
//! event/activity lookups, control registration, and the survey question
//! endpoints. Callers never touch raw HTTP or raw JSON shapes.
//!
//! # How it fits
//! The check-in resolver and the survey reconciler drive this client; the
//! back-office service constructs one per process and threads an operator
//! [`SessionContext`] through each call.
//!
//! # Key invariants
//! - List endpoints are normalized into one canonical [`Page`] at this
//!   boundary; the backend's array-vs-envelope duality never leaks upward.
//! - The bearer token travels inside [`SessionContext`] by value; the crate
//!   holds no ambient session state.
//! - Backend rejections keep their human-readable detail so the collision
//!   classifier in [`retry`] can inspect it.
//!
//! # Examples
//! ```no_run
//! use lanyard_api::{BackendClient, SessionContext};
//!
//! # async fn run() -> Result<(), lanyard_api::ApiError> {
//! let client = BackendClient::new("https://events.example.com/api".to_string());
//! let ctx = SessionContext::new("token");
//! let page = client.list_attendees(&ctx, 1, 100, Some(7)).await?;
//! println!("{} attendees", page.items.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod model;
mod page;
pub mod retry;
mod session;

pub use client::BackendClient;
pub use error::{ApiError, ApiResult};
pub use model::{
    Activity, Attendee, ControlRecord, ControlSubmission, Event, Question, QuestionKind,
    QuestionOption, SurveyTree,
};
pub use page::{DEFAULT_PAGE_SIZE, Page};
pub use retry::{RetryPolicy, is_order_collision};
pub use session::SessionContext;
