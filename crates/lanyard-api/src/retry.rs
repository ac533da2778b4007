//! Bounded retry for order-collision rejections on question creation.

use crate::error::ApiError;

/// Retry policy for creating questions under the backend's `(survey, order)`
/// unique constraint. Only collisions are worth retrying; everything else
/// fails fast.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub fn is_retryable(&self, err: &ApiError) -> bool {
        is_order_collision(err)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Classifies a creation failure as an order collision.
///
/// The backend has no structured code for the unique-order rejection; it
/// surfaces as HTTP 400 or as a message naming the "unique"/"order" rule.
/// All string matching on backend errors stays behind this function.
pub fn is_order_collision(err: &ApiError) -> bool {
    match err {
        ApiError::Status { status: 400, .. } => true,
        ApiError::Status { detail, .. } => mentions_order_rule(detail),
        ApiError::Rejected(detail) => mentions_order_rule(detail),
        ApiError::Network(_) | ApiError::Decode(_) => false,
    }
}

fn mentions_order_rule(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    lower.contains("unique") || lower.contains("order")
}
