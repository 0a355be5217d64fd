//! Test-support client for the pool frontend HTTP JSON API.
//!
//! # Overview
//! Wraps the frontend's user-management endpoints (signup, login/logout,
//! password and 2FA flows, payout settings) as typed convenience methods.
//! Each call is one blocking HTTP POST of a JSON payload to
//! `{base_url}/{operation}`; the parsed JSON reply is returned raw for the
//! test suite to assert on.
//!
//! # Design
//! - [`FrontendClient`] is stateless — it holds only the base URL and a
//!   reusable `ureq` agent.
//! - One request struct per operation; optional fields are `Option` and are
//!   omitted from the wire when unset, never defaulted.
//! - Every operation takes a trailing `required_status` / `debug` pair:
//!   `Some(expected)` turns a `status` mismatch into an error naming the
//!   operation, `debug` traces the exchange as a replayable curl command.
//! - No retries, timeouts or internal concurrency — a failed call is a
//!   failed test step.

pub mod client;
pub mod error;
pub mod requests;
mod trace;

pub use client::FrontendClient;
pub use error::ApiError;
pub use requests::{
    BackendManualPayout, UserAction, UserChangePasswordInitiate, UserCreate, UserGetCredentials,
    UserGetSettings, UserLogin, UserLogout, UserResendEmail, UserTwoFactorInitiate,
    UserUpdateSettings,
};
