use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use http::StatusCode;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::mapper::{map_upstream_result, INVALID_REQUEST_ERROR};
use crate::models::chat::{ChatRequest, ChatResponse};
use crate::util::{cors_layer_from_env, AppState};

/// Build the Axum router: `/`, `/static/*`, `/chat` and `/status`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let index = ServeFile::new(&state.index_file);
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route_service("/", index)
        .nest_service("/static", assets)
        .route("/chat", post(chat))
        .route("/status", get(status))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer_from_env()),
        )
}

/// Service status endpoint.
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let routes = vec!["/", "/static/*", "/chat", "/status"];
    Json(serde_json::json!({
        "name": "chatbridge",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.upstream.model(),
        "reference_document_bytes": state.reference.len(),
        "routes": routes
    }))
}

/// Build the prompt for one message, make the single upstream call and map the result.
async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let details = rejection.body_text();
            tracing::warn!(
                status = rejection.status().as_u16(),
                error = %details,
                "rejected chat request body"
            );
            return (
                rejection.status(),
                Json(ChatResponse::failure(
                    INVALID_REQUEST_ERROR,
                    serde_json::Value::String(details),
                )),
            );
        }
    };

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id, message_bytes = req.message.len());

    async move {
        let prompt = state.template.build(state.reference.as_str(), &req.message);
        let result = state.upstream.complete(&prompt).await;
        let (status, body) = map_upstream_result(result);
        tracing::info!(status = status.as_u16(), "chat request finished");
        (status, Json(body))
    }
    .instrument(span)
    .await
}
