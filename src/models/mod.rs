//! Data models for the inbound chat endpoint and the upstream completion API.
//!
//! This module groups two submodules:
//! - `chat`: the `/chat` request and response bodies exchanged with the browser page.
//! - `upstream`: the chat-completion payload sent to the provider and the tagged
//!   decoding of whatever JSON comes back.
//!
//! Mapping an upstream outcome to a `chat::ChatResponse` lives in `crate::mapper`.

pub mod chat;
pub mod upstream;

pub use chat::{ChatRequest, ChatResponse};
pub use upstream::{UpstreamMessage, UpstreamOutcome, UpstreamRequest};
