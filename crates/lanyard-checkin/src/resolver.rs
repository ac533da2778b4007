use crate::error::{CheckinError, CheckinResult};
use lanyard_api::{
    Attendee, BackendClient, ControlRecord, ControlSubmission, DEFAULT_PAGE_SIZE, SessionContext,
};
use lanyard_qr::{AttendeeRef, BadgePayload};

/// A scan that passed every validation and is ready to submit.
#[derive(Debug, Clone)]
pub struct ResolvedCheckin {
    pub attendee: Attendee,
    pub event_id: u64,
    pub activity_id: u64,
}

/// Drives a scanned badge through parsing, cross-validation, and attendee
/// resolution, then submits the control record on confirmation.
#[derive(Clone)]
pub struct CheckinResolver {
    client: BackendClient,
    page_size: u32,
}

impl CheckinResolver {
    pub fn new(client: BackendClient) -> Self {
        Self::with_page_size(client, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(client: BackendClient, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// Resolve a raw scan against the operator's (event, activity) selection.
    ///
    /// Ordering matters: the badge/event check needs no remote data and runs
    /// first, the activity check costs one lookup, and only then does the
    /// paginated attendee search start. Nothing is written here.
    pub async fn resolve(
        &self,
        ctx: &SessionContext,
        raw_scan: &str,
        event_id: u64,
        activity_id: u64,
    ) -> CheckinResult<ResolvedCheckin> {
        let badge = BadgePayload::decode(raw_scan.trim())?;
        if badge.event_id() != Some(event_id) {
            return Err(CheckinError::EventMismatch {
                badge: badge.event_ref,
                selected: event_id,
            });
        }
        let activity = self.client.get_activity(ctx, activity_id).await?;
        if activity.event != event_id {
            return Err(CheckinError::ActivityMismatch {
                activity: activity_id,
                actual: activity.event,
                selected: event_id,
            });
        }
        let attendee = self
            .find_attendee(ctx, &badge.attendee_ref, Some(event_id))
            .await?;
        Ok(ResolvedCheckin {
            attendee,
            event_id,
            activity_id,
        })
    }

    /// Walk the paginated attendee listing until the reference matches.
    ///
    /// First match wins; earlier pages take precedence. The walk continues
    /// while any of the backend's more-pages signals is present (next link,
    /// page count, item count, or a full page), so inconsistent metadata
    /// cannot cut the search short.
    pub async fn find_attendee(
        &self,
        ctx: &SessionContext,
        reference: &AttendeeRef,
        event: Option<u64>,
    ) -> CheckinResult<Attendee> {
        let mut page = 1u32;
        loop {
            let listing = self
                .client
                .list_attendees(ctx, page, self.page_size, event)
                .await?;
            tracing::debug!(page, items = listing.items.len(), "scanned attendee page");
            if let Some(attendee) = listing.items.iter().find(|candidate| {
                reference.matches(candidate.id, &candidate.email)
                    && event.is_none_or(|event_id| candidate.event == event_id)
            }) {
                return Ok(attendee.clone());
            }
            if !listing.has_more(page, self.page_size) {
                return Err(CheckinError::AttendeeNotFound {
                    reference: reference.to_string(),
                    pages: page,
                });
            }
            page += 1;
        }
    }

    /// Submit the control record for a resolved scan.
    ///
    /// One shot, no automatic retry: a duplicate registration comes back as
    /// `RemoteRejected` and the operator decides what to do with it.
    pub async fn submit(
        &self,
        ctx: &SessionContext,
        resolved: &ResolvedCheckin,
    ) -> CheckinResult<ControlRecord> {
        let record = self
            .client
            .submit_control(
                ctx,
                &ControlSubmission {
                    attendee_id: resolved.attendee.id,
                    event_id: resolved.event_id,
                    activity_id: resolved.activity_id,
                    attendee_email: resolved.attendee.email.clone(),
                },
            )
            .await?;
        Ok(record)
    }
}
