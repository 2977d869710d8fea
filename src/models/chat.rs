use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
///
/// The message is forwarded verbatim into the prompt; no trimming or validation happens
/// beyond requiring the field to be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Body returned from `POST /chat`.
///
/// Serialized untagged so the wire shape is exactly `{"response": ...}` on success or
/// `{"error": ..., "details": ...}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Success {
        response: String,
    },
    Failure {
        error: String,
        /// Full upstream body for application errors, or the error text for transport errors.
        details: serde_json::Value,
    },
}

impl ChatResponse {
    pub fn success(response: impl Into<String>) -> Self {
        ChatResponse::Success {
            response: response.into(),
        }
    }

    pub fn failure(error: impl Into<String>, details: serde_json::Value) -> Self {
        ChatResponse::Failure {
            error: error.into(),
            details,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ChatResponse::Success { .. })
    }
}
