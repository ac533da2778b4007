//! Seedable fake events backend for integration tests and local demos.
//!
//! # Purpose
//! The back-office talks to a remote events platform over REST. These tests
//! must exercise real HTTP behavior (pagination envelopes, duplicate-control
//! responses, unique-order rejections) without a live deployment, so this
//! crate serves an in-memory stand-in that speaks the same wire contract.
//!
//! # How it fits
//! - `backend` holds the seedable state and the Axum router that serves it.
//! - `http` carries small client/server helpers shared by integration tests.
//! - The `events-backend` binary serves a demo seed for poking by hand.
//!
//! # Key invariants
//! - Soft deletes: removing a question keeps its `order` reserved, so a
//!   later create at that order is rejected exactly like the real platform.
//! - Duplicate control submissions answer 200 with a detail body and no `id`.
//! - Every route requires the configured bearer token.

pub mod backend;
pub mod http;

pub use backend::{EventsBackend, PageStyle, RunningBackend};
pub use http::{build_test_client, spawn_axum_with_shutdown, wait_for_listen};
