use clap::Parser;

use crate::config::file::DatagenFileConfig;
use crate::config::settings::DatagenSettings;
use crate::domain::model::GenerationRequest;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};

#[derive(Debug, Clone, Parser)]
#[command(name = "tutor")]
#[command(about = "Ask an LLM tutor about technology or a code snippet")]
pub struct TutorCli {
    /// Question or code snippet; read from stdin when omitted
    pub query: Option<String>,

    #[arg(long, help = "Treat the query as a code snippet")]
    pub code: bool,

    #[arg(long, default_value = "a programming language")]
    pub language: String,

    #[arg(long, default_value = "gpt")]
    pub model: String,

    #[arg(long, default_value = "english")]
    pub answer_language: String,

    #[arg(long, default_value = "1000")]
    pub max_tokens: u32,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for TutorCli {
    fn validate(&self) -> Result<()> {
        validate_positive_number("max_tokens", self.max_tokens as usize, 1)?;
        validate_non_empty_string("language", &self.language)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "datagen")]
#[command(about = "Generate synthetic tabular data by prompting an LLM")]
pub struct DatagenCli {
    #[arg(long, default_value = "business")]
    pub domain: String,

    #[arg(long, default_value = "gpt")]
    pub model: String,

    #[arg(long)]
    pub samples: Option<usize>,

    #[arg(long, default_value = "json")]
    pub format: String,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    #[arg(long, help = "Path to a TOML file with generation defaults")]
    pub config: Option<String>,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl DatagenCli {
    /// Resolve the layered configuration (defaults, then file, then CLI
    /// flags) into a validated request plus pipeline settings.
    pub fn resolve(&self) -> Result<(GenerationRequest, DatagenSettings)> {
        let file = match &self.config {
            Some(path) => {
                let file = DatagenFileConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };

        let mut settings = DatagenSettings::default();
        if let Some(file) = &file {
            file.apply(&mut settings);
        }
        if let Some(samples) = self.samples {
            settings.samples = samples;
        }
        if let Some(max_tokens) = self.max_tokens {
            settings.max_tokens = max_tokens;
        }
        if let Some(output_path) = &self.output_path {
            settings.output_path = output_path.clone();
        }
        settings.validate()?;

        let domain = self.domain.parse()?;
        let model = self.model.parse()?;
        let output_format = self.format.parse()?;
        let schema_hint = match &file {
            Some(file) => file.schema_hint_for(domain)?,
            None => None,
        };

        let request = GenerationRequest {
            domain,
            model,
            sample_count: settings.samples,
            output_format,
            schema_hint,
        };

        Ok((request, settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DataDomain, ModelKind, OutputFormat};
    use std::io::Write;

    #[test]
    fn test_datagen_defaults_resolve() {
        let cli = DatagenCli::parse_from(["datagen"]);
        let (request, settings) = cli.resolve().unwrap();
        assert_eq!(request.domain, DataDomain::Business);
        assert_eq!(request.model, ModelKind::Gpt4oMini);
        assert_eq!(request.output_format, OutputFormat::Json);
        assert_eq!(request.sample_count, settings.samples);
        assert!(request.schema_hint.is_none());
    }

    #[test]
    fn test_cli_flags_override_file_config() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "[generation]\nsamples = 50\nmax_tokens = 2000").unwrap();

        let cli = DatagenCli::parse_from([
            "datagen",
            "--config",
            config.path().to_str().unwrap(),
            "--samples",
            "7",
        ]);
        let (request, settings) = cli.resolve().unwrap();
        assert_eq!(request.sample_count, 7);
        // file value survives where no flag overrides it
        assert_eq!(settings.max_tokens, 2000);
    }

    #[test]
    fn test_unsupported_domain_is_a_config_error() {
        let cli = DatagenCli::parse_from(["datagen", "--domain", "astrology"]);
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn test_zero_samples_rejected_before_any_network_call() {
        let cli = DatagenCli::parse_from(["datagen", "--samples", "0"]);
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn test_tutor_cli_validates() {
        let cli = TutorCli::parse_from(["tutor", "what is rust?"]);
        assert!(cli.validate().is_ok());

        let cli = TutorCli::parse_from(["tutor", "--max-tokens", "0", "hi"]);
        assert!(cli.validate().is_err());
    }
}
