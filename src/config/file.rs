use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::settings::DatagenSettings;
use crate::domain::model::{DataDomain, FieldHint};
use crate::utils::error::{Result, TutorgenError};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};

/// Optional TOML file with generation defaults and per-domain schema
/// overrides. CLI flags still win over anything set here.
///
/// ```toml
/// [generation]
/// samples = 25
/// max_tokens = 1500
/// batch_size = 10
///
/// [output]
/// path = "./data"
/// prefix = "synthetic"
///
/// [schema]
/// business = ["ticker:string", "close:float"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatagenFileConfig {
    pub generation: Option<GenerationSection>,
    pub output: Option<OutputSection>,
    pub schema: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSection {
    pub samples: Option<usize>,
    pub max_tokens: Option<u32>,
    pub batch_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub prefix: Option<String>,
}

impl DatagenFileConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| TutorgenError::config(format!("Invalid config file: {}", e)))
    }

    /// Layer this file's values over `settings`.
    pub fn apply(&self, settings: &mut DatagenSettings) {
        if let Some(generation) = &self.generation {
            if let Some(samples) = generation.samples {
                settings.samples = samples;
            }
            if let Some(max_tokens) = generation.max_tokens {
                settings.max_tokens = max_tokens;
            }
            if let Some(batch_size) = generation.batch_size {
                settings.batch_size = batch_size;
            }
        }
        if let Some(output) = &self.output {
            if let Some(path) = &output.path {
                settings.output_path = path.clone();
            }
            if let Some(prefix) = &output.prefix {
                settings.filename_prefix = prefix.clone();
            }
        }
    }

    /// Schema override for a domain, parsed from `"name:type hint"`
    /// entries. A bare name defaults its hint to "string".
    pub fn schema_hint_for(&self, domain: DataDomain) -> Result<Option<Vec<FieldHint>>> {
        let Some(schema) = &self.schema else {
            return Ok(None);
        };
        let Some(fields) = schema.get(domain.as_str()) else {
            return Ok(None);
        };

        let mut hints = Vec::with_capacity(fields.len());
        for entry in fields {
            let (name, hint) = match entry.split_once(':') {
                Some((name, hint)) => (name.trim(), hint.trim()),
                None => (entry.trim(), "string"),
            };
            if name.is_empty() {
                return Err(TutorgenError::config(format!(
                    "Empty field name in schema.{} entry '{}'",
                    domain, entry
                )));
            }
            hints.push(FieldHint::new(name, hint));
        }

        if hints.is_empty() {
            return Err(TutorgenError::config(format!(
                "schema.{} must list at least one field",
                domain
            )));
        }

        Ok(Some(hints))
    }
}

impl Validate for DatagenFileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(generation) = &self.generation {
            if let Some(samples) = generation.samples {
                validate_positive_number("generation.samples", samples, 1)?;
            }
            if let Some(batch_size) = generation.batch_size {
                validate_positive_number("generation.batch_size", batch_size, 1)?;
            }
        }
        if let Some(output) = &self.output {
            if let Some(path) = &output.path {
                validate_non_empty_string("output.path", path)?;
            }
        }
        if let Some(schema) = &self.schema {
            for key in schema.keys() {
                // Unknown section names are config mistakes, not new domains.
                key.parse::<DataDomain>()?;
            }
        }
        Ok(())
    }
}
