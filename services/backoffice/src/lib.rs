//! Back-office service library crate.
//!
//! # Purpose
//! Exposes the HTTP API surface, scan-session store, configuration, and
//! observability wiring for use by the binary and tests.
//!
//! # Notes
//! Module boundaries mirror the HTTP API: `api` holds the handlers, `app`
//! the router and shared state, `sessions` the in-memory scan sessions.
pub mod api;
pub mod app;
pub mod config;
pub mod observability;
pub mod sessions;
