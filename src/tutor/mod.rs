//! The tutor flow shared by the CLI and the HTTP API: build the prompt,
//! invoke the selected model, tidy the returned Markdown, optionally run a
//! second translation pass.

use std::str::FromStr;
use std::sync::Arc;

use crate::domain::ports::{ChatRequest, ModelClient};
use crate::prompt::{translation_prompt, user_prompt_for, TUTOR_SYSTEM_PROMPT};
use crate::utils::error::{Result, TutorgenError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerLanguage {
    English,
    Spanish,
}

impl FromStr for AnswerLanguage {
    type Err = TutorgenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(AnswerLanguage::English),
            "spanish" | "es" => Ok(AnswerLanguage::Spanish),
            other => Err(TutorgenError::config(format!(
                "Unsupported answer language '{}'. Supported: english, spanish",
                other
            ))),
        }
    }
}

pub struct TutorSession {
    client: Arc<dyn ModelClient>,
    max_tokens: u32,
    answer_language: AnswerLanguage,
}

impl TutorSession {
    pub fn new(client: Arc<dyn ModelClient>, max_tokens: u32) -> Self {
        Self {
            client,
            max_tokens,
            answer_language: AnswerLanguage::English,
        }
    }

    pub fn with_answer_language(mut self, language: AnswerLanguage) -> Self {
        self.answer_language = language;
        self
    }

    /// Ask the model to explain a question or code snippet. Returns the
    /// cleaned Markdown answer.
    pub async fn explain(&self, query: &str, is_code: bool, language: &str) -> Result<String> {
        if query.trim().is_empty() {
            return Err(TutorgenError::config("Query cannot be empty"));
        }

        let prompt = user_prompt_for(query, is_code, language);
        tracing::debug!("Asking {} for an explanation", self.client.provider());

        let reply = self
            .client
            .complete(ChatRequest {
                system: Some(TUTOR_SYSTEM_PROMPT),
                prompt: &prompt,
                max_tokens: self.max_tokens,
            })
            .await?;

        let mut answer = clean_markdown(&reply);

        if self.answer_language == AnswerLanguage::Spanish {
            tracing::debug!("Running translation pass");
            let translated = self
                .client
                .complete(ChatRequest {
                    system: None,
                    prompt: &translation_prompt(&answer, "Spanish"),
                    max_tokens: self.max_tokens,
                })
                .await?;
            answer = clean_markdown(&translated);
        }

        Ok(answer)
    }
}

/// Models sometimes wrap the whole answer in a markdown fence even though
/// the answer IS markdown. Unwrap that outer fence; fences inside the
/// answer (code blocks) are left alone.
pub fn clean_markdown(reply: &str) -> String {
    let trimmed = reply.trim();
    let mut lines: Vec<&str> = trimmed.lines().collect();

    if lines.len() >= 2 {
        let first = lines[0].trim();
        let last = lines[lines.len() - 1].trim();
        if (first == "```" || first == "```markdown" || first == "```md") && last == "```" {
            lines.remove(0);
            lines.pop();
            return lines.join("\n").trim().to_string();
        }
    }

    trimmed.to_string()
}
