use crate::domain::model::Provider;
use crate::providers::anthropic::ANTHROPIC_BASE_URL;
use crate::providers::ollama::OLLAMA_BASE_URL;
use crate::providers::openai::OPENAI_BASE_URL;
use crate::utils::error::{Result, TutorgenError};
use crate::utils::validation::{validate_url, Validate};

/// Provider credentials and endpoints, resolved once at startup and passed
/// into the adapters explicitly. Nothing below this struct reads the
/// environment, which keeps the adapters testable with fake keys.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    /// Endpoint overrides, mainly for tests and proxies.
    pub openai_base_url: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub ollama_base_url: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            openai_base_url: None,
            anthropic_base_url: None,
            ollama_base_url: OLLAMA_BASE_URL.to_string(),
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Credentials {
    /// Read keys and endpoints from the environment, honoring a `.env`
    /// file when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            openai_api_key: env_non_empty("OPENAI_API_KEY"),
            anthropic_api_key: env_non_empty("ANTHROPIC_API_KEY"),
            openai_base_url: env_non_empty("OPENAI_BASE_URL"),
            anthropic_base_url: env_non_empty("ANTHROPIC_BASE_URL"),
            ollama_base_url: env_non_empty("OLLAMA_BASE_URL")
                .unwrap_or_else(|| OLLAMA_BASE_URL.to_string()),
        }
    }

    pub fn openai_endpoint(&self) -> &str {
        self.openai_base_url.as_deref().unwrap_or(OPENAI_BASE_URL)
    }

    pub fn anthropic_endpoint(&self) -> &str {
        self.anthropic_base_url
            .as_deref()
            .unwrap_or(ANTHROPIC_BASE_URL)
    }

    /// Fail fast when the key a provider needs is absent. Called at
    /// startup/client construction, never per request.
    pub fn require(&self, provider: Provider) -> Result<()> {
        match provider {
            Provider::OpenAi if self.openai_api_key.is_none() => {
                Err(TutorgenError::MissingApiKey {
                    provider: "openai",
                    env_var: "OPENAI_API_KEY",
                })
            }
            Provider::Anthropic if self.anthropic_api_key.is_none() => {
                Err(TutorgenError::MissingApiKey {
                    provider: "anthropic",
                    env_var: "ANTHROPIC_API_KEY",
                })
            }
            // Ollama is keyless; a dead daemon surfaces as a provider error.
            _ => Ok(()),
        }
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<()> {
        validate_url("openai_base_url", self.openai_endpoint())?;
        validate_url("anthropic_base_url", self.anthropic_endpoint())?;
        validate_url("ollama_base_url", &self.ollama_base_url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake() -> Credentials {
        Credentials {
            openai_api_key: Some("sk-test".to_string()),
            anthropic_api_key: None,
            openai_base_url: None,
            anthropic_base_url: None,
            ollama_base_url: OLLAMA_BASE_URL.to_string(),
        }
    }

    #[test]
    fn test_require_passes_with_key_present() {
        assert!(fake().require(Provider::OpenAi).is_ok());
    }

    #[test]
    fn test_require_fails_fast_without_key() {
        let err = fake().require(Provider::Anthropic).unwrap_err();
        assert!(matches!(err, TutorgenError::MissingApiKey { .. }));
    }

    #[test]
    fn test_ollama_never_needs_a_key() {
        assert!(fake().require(Provider::Ollama).is_ok());
    }

    #[test]
    fn test_default_endpoints_are_valid_urls() {
        assert!(fake().validate().is_ok());
    }

    #[test]
    fn test_bad_override_rejected() {
        let creds = Credentials {
            openai_base_url: Some("not a url".to_string()),
            ..fake()
        };
        assert!(creds.validate().is_err());
    }
}
