//! Human-readable wire traces for debug mode.
//!
//! The rendered trace is an equivalent curl invocation followed by the
//! pretty-printed response, so a failing test step can be replayed from a
//! shell verbatim.

use serde_json::Value;

/// Render one request/response exchange as a replayable curl command plus
/// the indented JSON response.
pub(crate) fn curl_trace(url: &str, body: &str, response: &Value) -> String {
    let pretty =
        serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
    format!("curl -X POST -d '{body}' {url}\n{pretty}")
}
