use serde::Serialize;
use serde_with::skip_serializing_none;

/// Chat-completion role. Only `user` is ever sent, but the wire value stays explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamMessage {
    pub role: Role,
    pub content: String,
}

/// OpenRouter chat-completion request body.
///
/// Example:
/// {
///   "model": "google/gemini-2.0-flash-thinking-exp:free",
///   "messages": [{ "role": "user", "content": "..." }],
///   "http_referer": "https://...",
///   "http_user_agent": "..."
/// }
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamRequest {
    pub model: String,
    pub messages: Vec<UpstreamMessage>,
    pub http_referer: Option<String>,
    pub http_user_agent: Option<String>,
}

impl UpstreamRequest {
    /// Single-turn request carrying the whole prompt as one user message.
    pub fn single_user(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![UpstreamMessage {
                role: Role::User,
                content: prompt.into(),
            }],
            http_referer: None,
            http_user_agent: None,
        }
    }
}

/// Decoded shape of an upstream reply.
///
/// The provider's JSON is never trusted to match a schema: anything that does not carry a
/// string at `choices[0].message.content` is kept whole as `Malformed`.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    Success { content: String },
    Malformed { raw: serde_json::Value },
}

impl UpstreamOutcome {
    pub fn from_value(raw: serde_json::Value) -> Self {
        // A null or non-string `content` is Malformed (500), not relayed as a 200: `/chat`
        // replies always carry a string `response`.
        let content = raw
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|choices| choices.first())
            .and_then(|first| first.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_owned);

        match content {
            Some(content) => UpstreamOutcome::Success { content },
            None => UpstreamOutcome::Malformed { raw },
        }
    }
}
