use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent the process from serving traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read reference document {}: {source}", .path.display())]
    ReferenceDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("failed to load prompt config: {0:#}")]
    PromptConfig(anyhow::Error),

    #[error("failed to build upstream HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failures of the upstream call itself, as opposed to an upstream reply that decodes
/// but lacks a completion.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned a body that is not JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Transport(e) if e.is_timeout())
    }

    /// Error text with its full source chain, e.g.
    /// `upstream request failed: error sending request for url (...): operation timed out`.
    pub fn details(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        // Display of the first source is already part of `self`.
        if let Some(first) = source {
            source = first.source();
        }
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}
