//! Single-shot client for the OpenRouter chat-completion endpoint.

use std::time::Duration;

use http::header;

use crate::config::BridgeConfig;
use crate::error::UpstreamError;
use crate::models::upstream::UpstreamRequest;

/// Sends one completion request per prompt. Never retries.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
    referer: String,
    title: String,
    user_agent: String,
    prompt_training: String,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(http: reqwest::Client, config: &BridgeConfig) -> Self {
        Self {
            http,
            url: config.upstream_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
            user_agent: config.user_agent.clone(),
            prompt_training: config.prompt_training.clone(),
            timeout: config.timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request body for `prompt`.
    pub fn request_body(&self, prompt: &str) -> UpstreamRequest {
        let mut body = UpstreamRequest::single_user(&self.model, prompt);
        body.http_referer = Some(self.referer.clone());
        body.http_user_agent = Some(self.user_agent.clone());
        body
    }

    /// POST the prompt and decode whatever JSON comes back.
    ///
    /// The upstream HTTP status is not inspected: error replies from the provider are JSON
    /// too and are classified by shape in `crate::mapper`. Only transport failures
    /// (connect, DNS, timeout) and non-JSON bodies are errors here.
    pub async fn complete(&self, prompt: &str) -> Result<serde_json::Value, UpstreamError> {
        let body = self.request_body(prompt);

        tracing::debug!(
            url = %self.url,
            model = %self.model,
            prompt_bytes = prompt.len(),
            "sending upstream completion request"
        );

        let resp = self
            .http
            .post(&self.url)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .header("OR-PROMPT-TRAINING", &self.prompt_training)
            .json(&body)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(UpstreamError::Transport)?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(UpstreamError::Decode)?;

        tracing::debug!(status = %status, body = %value, "upstream raw response");
        Ok(value)
    }
}
