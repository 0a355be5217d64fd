//! Error types for the pool frontend client.
//!
//! # Design
//! `StatusMismatch` gets a dedicated variant because it is the interesting
//! failure for a test suite: the call completed, the server answered, and
//! the answer was wrong. Its message names the failing operation so a test
//! log reads "userLogout failed" rather than a bare status diff. Transport
//! and JSON failures propagate unchanged.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`FrontendClient`](crate::FrontendClient) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed: connection refused, DNS failure,
    /// timeout. Propagated unchanged from the HTTP layer.
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    /// The request payload could not be serialized to JSON.
    #[error("request encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body was not valid JSON.
    #[error("malformed response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The response's `status` field did not match the caller's expectation.
    /// `actual` is the raw value from the response, `null` when absent.
    #[error("{operation} failed: expected status {expected:?}, got {actual}")]
    StatusMismatch {
        operation: String,
        expected: String,
        actual: Value,
    },
}
