//! Survey question-tree reconciliation for the event back-office.
//!
//! # Purpose
//! Makes the backend's question tree match an operator's edited question
//! list, wholesale: delete the old questions, recreate the new ones with
//! fresh order numbers, then recreate each question's options.
//!
//! # How it fits
//! The back-office service runs one [`SurveyReconciler`] per replace request
//! over the shared [`lanyard_api::BackendClient`]. The backend offers no
//! multi-object transaction, so the run is best-effort and the returned
//! [`ReconcileSummary`] is the caller's source of truth for what to retry.
//!
//! # Key invariants
//! - Order numbers start above the highest order seen BEFORE deleting;
//!   deletes may be soft and the backend keeps its `(survey, order)` unique
//!   constraint against soft-deleted rows.
//! - Deletions, order assignment, and creations stay strictly sequential
//!   within one run; two concurrent runs on one survey are not coordinated.
//! - A failed step never aborts the run; it lands in the error list.

mod plan;
mod reconciler;

pub use plan::{DesiredQuestion, NO_LABEL, YES_LABEL};
pub use reconciler::{CreatedQuestion, ReconcileSummary, SurveyReconciler};
