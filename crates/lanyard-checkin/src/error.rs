use lanyard_api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckinError {
    #[error("malformed badge payload: {0}")]
    MalformedPayload(#[from] lanyard_qr::Error),
    #[error("no attendee matching {reference} after {pages} pages")]
    AttendeeNotFound { reference: String, pages: u32 },
    #[error("badge event {badge:?} does not match selected event {selected}")]
    EventMismatch { badge: String, selected: u64 },
    #[error("activity {activity} belongs to event {actual}, not selected event {selected}")]
    ActivityMismatch {
        activity: u64,
        actual: u64,
        selected: u64,
    },
    #[error(transparent)]
    Network(ApiError),
    #[error(transparent)]
    RemoteRejected(ApiError),
}

pub type CheckinResult<T> = Result<T, CheckinError>;

// Transport failures and backend rejections stay distinguishable for the
// operator: one means retry the network, the other means the backend said no.
impl From<ApiError> for CheckinError {
    fn from(err: ApiError) -> Self {
        if err.is_network() {
            Self::Network(err)
        } else {
            Self::RemoteRejected(err)
        }
    }
}
