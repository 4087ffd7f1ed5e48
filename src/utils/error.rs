use thiserror::Error;

#[derive(Error, Debug)]
pub enum TutorgenError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing API key for {provider}: set {env_var}")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("{provider} is unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("{provider} signalled rate limiting")]
    RateLimited { provider: String },

    #[error("Could not parse model reply: {message}")]
    Parse {
        message: String,
        raw_reply: Option<String>,
    },

    #[error("Schema inference failed for column '{column}': {detail}")]
    SchemaInference { column: String, detail: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Provider,
    Parsing,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Informational, the run still counts as a success.
    Low,
    /// Transient provider-side trouble, retrying later may help.
    Medium,
    /// The request itself failed and produced no output.
    High,
    /// The process cannot do useful work at all.
    Critical,
}

impl TutorgenError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } | Self::MissingApiKey { .. } => ErrorCategory::Configuration,
            Self::ProviderUnavailable { .. } | Self::RateLimited { .. } | Self::Http(_) => {
                ErrorCategory::Provider
            }
            Self::Parse { .. } | Self::Serialization(_) => ErrorCategory::Parsing,
            Self::SchemaInference { .. } | Self::Csv(_) | Self::Arrow(_) | Self::Parquet(_) => {
                ErrorCategory::Output
            }
            Self::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config { .. } | Self::MissingApiKey { .. } => ErrorSeverity::Critical,
            Self::ProviderUnavailable { .. } | Self::RateLimited { .. } | Self::Http(_) => {
                ErrorSeverity::Medium
            }
            Self::Parse { .. }
            | Self::SchemaInference { .. }
            | Self::Csv(_)
            | Self::Serialization(_)
            | Self::Arrow(_)
            | Self::Parquet(_) => ErrorSeverity::High,
            Self::Io(_) => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config { message } => format!("Invalid configuration: {}", message),
            Self::MissingApiKey { provider, env_var } => {
                format!("No API key configured for {} ({} is not set)", provider, env_var)
            }
            Self::ProviderUnavailable { provider, reason } => {
                format!("Could not reach {}: {}", provider, reason)
            }
            Self::RateLimited { provider } => {
                format!("{} is throttling requests right now", provider)
            }
            Self::Parse { message, .. } => {
                format!("The model reply could not be interpreted: {}", message)
            }
            Self::SchemaInference { column, detail } => {
                format!("Column '{}' has conflicting value types: {}", column, detail)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Config { .. } => "Check the command line flags and the config file values",
            Self::MissingApiKey { .. } => "Export the key in your shell or add it to a .env file",
            Self::ProviderUnavailable { .. } => {
                "Verify network connectivity and that the provider endpoint is correct"
            }
            Self::RateLimited { .. } => "Wait a bit and retry, or switch to a different model",
            Self::Parse { .. } => {
                "Retry the generation, lower the sample count, or try another model"
            }
            Self::SchemaInference { .. } => {
                "Use the json or csv output format, which accept mixed value types"
            }
            Self::Http(_) => "Verify network connectivity and the provider endpoint",
            Self::Csv(_) | Self::Serialization(_) | Self::Arrow(_) | Self::Parquet(_) => {
                "Inspect the generated records for unexpected value shapes"
            }
            Self::Io(_) => "Check that the output path exists and is writable",
        }
    }

    /// Attach the raw model reply to a parse error for debugging.
    pub fn parse_with_reply(message: impl Into<String>, raw_reply: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            raw_reply: Some(raw_reply.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TutorgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_severity() {
        let config = TutorgenError::config("bad domain");
        assert_eq!(config.exit_code(), 3);

        let rate_limited = TutorgenError::RateLimited {
            provider: "openai".to_string(),
        };
        assert_eq!(rate_limited.exit_code(), 2);

        let parse = TutorgenError::Parse {
            message: "no JSON array found".to_string(),
            raw_reply: None,
        };
        assert_eq!(parse.exit_code(), 1);
    }

    #[test]
    fn test_categories() {
        let missing = TutorgenError::MissingApiKey {
            provider: "anthropic",
            env_var: "ANTHROPIC_API_KEY",
        };
        assert_eq!(missing.category(), ErrorCategory::Configuration);

        let schema = TutorgenError::SchemaInference {
            column: "price".to_string(),
            detail: "string and object".to_string(),
        };
        assert_eq!(schema.category(), ErrorCategory::Output);
    }

    #[test]
    fn test_parse_with_reply_keeps_raw_text() {
        let err = TutorgenError::parse_with_reply("not an array", "Sorry, I cannot do that");
        match err {
            TutorgenError::Parse { raw_reply, .. } => {
                assert_eq!(raw_reply.as_deref(), Some("Sorry, I cannot do that"));
            }
            _ => panic!("expected Parse variant"),
        }
    }
}
