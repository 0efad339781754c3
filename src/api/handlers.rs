// src/api/handlers.rs
// Thin HTTP wrappers around the classification and response coordinators.

use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::CONFIG;
use crate::extract::{self, ExtractError};
use crate::state::AppState;

/// Liveness probe
pub async fn index_handler() -> &'static str {
    "email-triage backend up. Use /process, /process-file or /health."
}

/// Health check handler. Also reports whether the model path is active,
/// which triggers the lazy backend load on first call.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "model_active": state.classifier.model_active().await,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339()
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Classify raw email text and suggest a reply.
pub async fn process_text_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProcessRequest>,
) -> ApiResult<Json<Value>> {
    let text = req.text.unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Field 'text' is empty or missing"));
    }

    Ok(Json(run_pipeline(&state, text).await))
}

/// Extract text from an uploaded .txt/.pdf file, then classify it.
pub async fn process_file_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ApiError::bad_request("Empty filename"));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let Some((filename, bytes)) = upload else {
        return Err(ApiError::bad_request("Send a file in the 'file' field"));
    };

    let text = extract::extract_text(&filename, &bytes)
        .map_err(|e: ExtractError| ApiError::unprocessable_entity(e.to_string()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request(
            "Could not extract any text from the file",
        ));
    }

    info!(file = %filename, chars = text.len(), "processing uploaded file");
    Ok(Json(run_pipeline(&state, text).await))
}

async fn run_pipeline(state: &AppState, text: &str) -> Value {
    let result = state.classifier.classify(text).await;
    let reply = state
        .responder
        .suggest(result.label.as_str(), text, CONFIG.use_generative)
        .await;

    json!({
        "category": result.label.as_str(),
        "scores": result.scores,
        "suggested_response": reply,
        "preprocessed": extract::preprocess(text),
    })
}
