//! Map the result of the upstream call to the `/chat` reply.
//!
//! Every request ends in exactly one of three outcomes:
//! - completion present: 200 `{"response": content}`
//! - JSON without a completion: 500 with the whole upstream body as `details`
//! - transport or decode failure: 500 with the error text as `details`

use http::StatusCode;

use crate::error::UpstreamError;
use crate::models::chat::ChatResponse;
use crate::models::upstream::UpstreamOutcome;

pub const MODEL_RESPONSE_ERROR: &str = "model response error";
pub const UPSTREAM_CONNECT_ERROR: &str = "failed to connect to upstream provider";
pub const INVALID_REQUEST_ERROR: &str = "invalid request body";

pub fn map_upstream_result(
    result: Result<serde_json::Value, UpstreamError>,
) -> (StatusCode, ChatResponse) {
    match result {
        Ok(raw) => map_outcome(UpstreamOutcome::from_value(raw)),
        Err(err) => {
            let details = err.details();
            if err.is_timeout() {
                tracing::warn!(error = %details, "upstream request timed out");
            } else {
                tracing::error!(error = %details, "upstream request failed");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ChatResponse::failure(UPSTREAM_CONNECT_ERROR, serde_json::Value::String(details)),
            )
        }
    }
}

pub fn map_outcome(outcome: UpstreamOutcome) -> (StatusCode, ChatResponse) {
    match outcome {
        UpstreamOutcome::Success { content } => (StatusCode::OK, ChatResponse::success(content)),
        UpstreamOutcome::Malformed { raw } => {
            tracing::warn!(body = %raw, "upstream response has no usable choices");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ChatResponse::failure(MODEL_RESPONSE_ERROR, raw),
            )
        }
    }
}
