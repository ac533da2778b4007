/// Operator context threaded through every backend call.
///
/// The token originates from the login shell's HTTP-only cookie and is opaque
/// here. The selected event is the operator's working filter; calls that need
/// it read it from this value rather than any ambient state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub token: String,
    pub selected_event: Option<u64>,
}

impl SessionContext {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            selected_event: None,
        }
    }

    pub fn with_event(token: impl Into<String>, event_id: u64) -> Self {
        Self {
            token: token.into(),
            selected_event: Some(event_id),
        }
    }
}
