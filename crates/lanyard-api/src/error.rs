use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend rejected the request: {0}")]
    Rejected(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    // Transport-level failure, as opposed to a response the backend produced.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_variants() {
        let errors = vec![
            ApiError::Status {
                status: 403,
                detail: "forbidden".to_string(),
            },
            ApiError::Rejected("already registered".to_string()),
        ];

        for error in errors {
            let rendered = error.to_string();
            assert!(!rendered.is_empty());
        }
    }

    #[test]
    fn status_is_not_network() {
        let err = ApiError::Status {
            status: 500,
            detail: "boom".to_string(),
        };
        assert!(!err.is_network());
    }
}
