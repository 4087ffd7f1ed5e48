use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::model::Provider;
use crate::domain::ports::{ChatRequest, ModelClient};
use crate::providers::{check_status, connection_error, TEMPERATURE};
use crate::utils::error::{Result, TutorgenError};

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

// Local models on CPU can be very slow; match the generous window the
// hosted providers get.
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Client for a local Ollama daemon, which serves the open-weight models
/// (llama, phi-3, gemma). No API key involved.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Whether the daemon answers at all. Used by the health endpoint; a
    /// dead daemon is reported, not treated as a server error.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: request.prompt,
            system: request.system,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                num_predict: request.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.base_url);
        debug!("Calling Ollama model {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| connection_error(Provider::Ollama, e))?;

        let response = check_status(Provider::Ollama, response).await?;

        let reply: GenerateResponse = response.json().await.map_err(|e| {
            TutorgenError::Parse {
                message: format!("Malformed Ollama response: {}", e),
                raw_reply: None,
            }
        })?;

        Ok(reply.response)
    }

    fn provider(&self) -> Provider {
        Provider::Ollama
    }
}
