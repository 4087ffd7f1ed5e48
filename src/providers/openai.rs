use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::model::Provider;
use crate::domain::ports::{ChatRequest, ModelClient};
use crate::providers::{check_status, connection_error, TEMPERATURE};
use crate::utils::error::{Result, TutorgenError};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT_SECS: u64 = 300;

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl OpenAiClient {
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
impl ModelClient for OpenAiClient {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: request.prompt,
        });

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("Calling OpenAI model {}", self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| connection_error(Provider::OpenAi, e))?;

        let response = check_status(Provider::OpenAi, response).await?;

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            TutorgenError::Parse {
                message: format!("Malformed OpenAI response: {}", e),
                raw_reply: None,
            }
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| TutorgenError::Parse {
                message: "OpenAI reply contained no choices".to_string(),
                raw_reply: None,
            })
    }

    fn provider(&self) -> Provider {
        Provider::OpenAi
    }
}
