use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::model::Provider;
use crate::domain::ports::{ChatRequest, ModelClient};
use crate::providers::{check_status, connection_error, TEMPERATURE};
use crate::utils::error::{Result, TutorgenError};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 300;

pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: TEMPERATURE,
            system: request.system,
            messages: vec![Message {
                role: "user",
                content: request.prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.base_url);
        debug!("Calling Anthropic model {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| connection_error(Provider::Anthropic, e))?;

        let response = check_status(Provider::Anthropic, response).await?;

        let reply: MessagesResponse = response.json().await.map_err(|e| {
            TutorgenError::Parse {
                message: format!("Malformed Anthropic response: {}", e),
                raw_reply: None,
            }
        })?;

        reply
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| TutorgenError::Parse {
                message: "Anthropic reply contained no text blocks".to_string(),
                raw_reply: None,
            })
    }

    fn provider(&self) -> Provider {
        Provider::Anthropic
    }
}
