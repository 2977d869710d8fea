#![forbid(unsafe_code)]
#![doc = r#"
ChatBridge

Serve a static chat page and bridge each chat message to an OpenRouter chat-completion
endpoint, with a persona prompt and a fixed reference document injected before forwarding.

Crate highlights
- Library: pure prompt construction via `PromptTemplate::build` / `build_prompt`.
- HTTP server (in `server`): `/`, `/static/*`, `/chat` and `/status`.
- One upstream call per `/chat` request; no retries, no caching, no conversation state.

Modules
- `config`: Environment-driven startup configuration.
- `prompt` / `prompt_config`: Persona template, reference document and optional JSON override.
- `upstream`: The single-shot OpenRouter client.
- `mapper`: Upstream result → `/chat` reply.
- `models`: Wire types for `/chat` and the completion API.
- `server`: Axum router/handlers.
- `util`: Shared helpers (tracing, app state, HTTP client, CORS, shutdown).
"#]

pub mod config;
pub mod error;
pub mod mapper;
pub mod models;
pub mod prompt;
pub mod prompt_config;
pub mod server;
pub mod upstream;
pub mod util;

pub use crate::config::BridgeConfig;
pub use crate::error::{StartupError, UpstreamError};
pub use crate::prompt::{build_prompt, PromptTemplate, ReferenceDocument};
pub use crate::server::build_router;
pub use crate::util::AppState;

pub use crate::models::{chat, upstream as wire};
