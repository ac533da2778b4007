//! QR check-in resolution for the event back-office.
//!
//! # Purpose
//! Turns a scanned badge plus the operator's (event, activity) selection into
//! a registered control record: parse, cross-validate, locate the attendee in
//! the paginated remote listing, then submit exactly one registration.
//!
//! # How it fits
//! The back-office service owns one [`CheckinResolver`] and a store of
//! [`ScanSession`] state machines; this crate owns the resolution rules and
//! the session lifecycle, [`lanyard_api`] owns the wire.
//!
//! # Key invariants
//! - Mismatch checks run strictly before any write; a rejected scan never
//!   reaches the control endpoint.
//! - Pagination keeps going while any more-pages signal is present, so a
//!   match on the last page is always found.
//! - `Failed` is terminal per scan; recovery is a fresh scan session.

mod error;
mod resolver;
mod session;

pub use error::{CheckinError, CheckinResult};
pub use resolver::{CheckinResolver, ResolvedCheckin};
pub use session::{ScanPhase, ScanSession, SessionError};
