//! Back-office HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the shared credential extraction every
//! authenticated endpoint goes through.
pub mod checkin;
pub mod error;
pub mod openapi;
pub mod reports;
pub mod surveys;
pub mod system;
pub mod types;

use crate::api::error::{ApiError, api_unauthorized};
use axum::http::{HeaderMap, header};

pub(crate) const SESSION_COOKIE: &str = "backoffice_session";

/// Pulls the events-platform bearer token out of a request.
///
/// The `Authorization` header wins; the login shell's HTTP-only
/// `backoffice_session` cookie is the fallback for browser calls that cannot
/// set headers. The token itself is opaque here, it is only forwarded.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        && let Some(token) = value.strip_prefix("Bearer ")
        && !token.is_empty()
    {
        return Ok(token.to_string());
    }
    if let Some(cookies) = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
    {
        for pair in cookies.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=')
                && name == SESSION_COOKIE
                && !value.is_empty()
            {
                return Ok(value.to_string());
            }
        }
    }
    Err(api_unauthorized("missing events platform credentials"))
}
