//! Provider adapters. One `ModelClient` implementation per external API;
//! call sites pick a model via `ModelKind` and never name a concrete client.

pub mod anthropic;
pub mod ollama;
pub mod openai;

use std::sync::Arc;

use crate::config::credentials::Credentials;
use crate::domain::model::{ModelKind, Provider};
use crate::domain::ports::ModelClient;
use crate::utils::error::{Result, TutorgenError};

pub use anthropic::AnthropicClient;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

/// Sampling temperature used by every adapter.
pub(crate) const TEMPERATURE: f32 = 0.7;

/// Build the client for a model. Fails fast when the provider's API key is
/// missing, so a bad environment surfaces at startup rather than mid-run.
pub fn client_for(model: ModelKind, credentials: &Credentials) -> Result<Arc<dyn ModelClient>> {
    credentials.require(model.provider())?;

    let client: Arc<dyn ModelClient> = match model.provider() {
        Provider::OpenAi => Arc::new(OpenAiClient::new(
            credentials.openai_api_key.clone().unwrap_or_default(),
            model.wire_id(),
            credentials.openai_endpoint(),
        )),
        Provider::Anthropic => Arc::new(AnthropicClient::new(
            credentials.anthropic_api_key.clone().unwrap_or_default(),
            model.wire_id(),
            credentials.anthropic_endpoint(),
        )),
        Provider::Ollama => Arc::new(OllamaClient::new(
            model.wire_id(),
            &credentials.ollama_base_url,
        )),
    };

    Ok(client)
}

/// Map a transport-level failure to the error taxonomy. Never retried here;
/// the caller decides what a connection failure means for the run.
pub(crate) fn connection_error(provider: Provider, err: reqwest::Error) -> TutorgenError {
    TutorgenError::ProviderUnavailable {
        provider: provider.to_string(),
        reason: err.to_string(),
    }
}

/// Turn a non-success HTTP status into the matching error. 429 gets its own
/// variant so callers can distinguish throttling from an outage.
pub(crate) async fn check_status(
    provider: Provider,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(TutorgenError::RateLimited {
            provider: provider.to_string(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    let mut reason = format!("HTTP {}", status);
    if !body.is_empty() {
        let snippet: String = body.chars().take(200).collect();
        reason = format!("{}: {}", reason, snippet);
    }

    Err(TutorgenError::ProviderUnavailable {
        provider: provider.to_string(),
        reason,
    })
}
