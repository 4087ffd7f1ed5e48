use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::LocalStorage;
use crate::core::engine::GenerationEngine;
use crate::core::pipeline::GenerationPipeline;
use crate::domain::model::GenerationRequest;
use crate::providers::{client_for, OllamaClient};
use crate::tutor::TutorSession;
use crate::utils::error::TutorgenError;
use crate::utils::validation::Validate;

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub is_code: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub answer_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TutorResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequestBody {
    pub domain: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub samples: Option<usize>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub path: String,
    pub rows: usize,
    pub dropped: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn status_for(err: &TutorgenError) -> StatusCode {
    match err {
        TutorgenError::Config { .. } => StatusCode::BAD_REQUEST,
        TutorgenError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_reply(err: TutorgenError) -> HandlerError {
    tracing::error!("Request failed: {}", err);
    (
        status_for(&err),
        Json(ErrorResponse {
            error: err.user_friendly_message(),
        }),
    )
}

/// `POST /api/tutor`: forward a question or code snippet to the selected
/// model and return the Markdown explanation. A missing query is rejected
/// before any provider call is made.
pub async fn tutor(
    State(state): State<AppState>,
    Json(body): Json<TutorRequest>,
) -> Result<Json<TutorResponse>, HandlerError> {
    let query = body
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| error_reply(TutorgenError::config("Field 'query' is required")))?
        .to_string();

    let model = body
        .model
        .as_deref()
        .unwrap_or("gpt")
        .parse()
        .map_err(error_reply)?;
    let answer_language = body
        .answer_language
        .as_deref()
        .unwrap_or("english")
        .parse()
        .map_err(error_reply)?;

    let client = client_for(model, &state.credentials).map_err(error_reply)?;
    let session =
        TutorSession::new(client, state.settings.max_tokens).with_answer_language(answer_language);

    let language = body
        .language
        .unwrap_or_else(|| "a programming language".to_string());

    let response = session
        .explain(&query, body.is_code, &language)
        .await
        .map_err(error_reply)?;

    Ok(Json(TutorResponse { response }))
}

/// `POST /api/generate`: run the synthetic-data pipeline and report where
/// the artifact landed.
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequestBody>,
) -> Result<Json<GenerateResponse>, HandlerError> {
    let mut settings = (*state.settings).clone();
    if let Some(samples) = body.samples {
        settings.samples = samples;
    }
    settings.validate().map_err(error_reply)?;

    let domain = body.domain.parse().map_err(error_reply)?;
    let model = body
        .model
        .as_deref()
        .unwrap_or("gpt")
        .parse()
        .map_err(error_reply)?;
    let output_format = body
        .format
        .as_deref()
        .unwrap_or("json")
        .parse()
        .map_err(error_reply)?;

    let request = GenerationRequest {
        domain,
        model,
        sample_count: settings.samples,
        output_format,
        schema_hint: None,
    };

    let client = client_for(model, &state.credentials).map_err(error_reply)?;
    let storage = LocalStorage::new(settings.output_path.clone());
    let pipeline = GenerationPipeline::new(storage, settings, request, client);
    let engine = GenerationEngine::new(pipeline);

    let artifact = engine.run().await.map_err(error_reply)?;

    Ok(Json(GenerateResponse {
        path: artifact.path,
        rows: artifact.rows_written,
        dropped: artifact.rows_dropped,
    }))
}

#[derive(Debug, Serialize)]
pub struct KeyStatus {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OllamaStatus {
    pub status: &'static str,
    pub endpoint: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub openai: KeyStatus,
    pub anthropic: KeyStatus,
    pub ollama: OllamaStatus,
}

fn key_status(present: bool) -> KeyStatus {
    KeyStatus {
        status: if present { "configured" } else { "unconfigured" },
    }
}

/// `GET /health`: report which providers this process could actually
/// call. An unreachable Ollama daemon is reported, not an error.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ollama = OllamaClient::new("llama3.2", &state.credentials.ollama_base_url);
    let ollama_up = ollama.is_available().await;

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        openai: key_status(state.credentials.openai_api_key.is_some()),
        anthropic: key_status(state.credentials.anthropic_api_key.is_some()),
        ollama: OllamaStatus {
            status: if ollama_up { "available" } else { "unreachable" },
            endpoint: state.credentials.ollama_base_url.clone(),
        },
    })
}
