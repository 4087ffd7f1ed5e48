use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::TutorgenError;

/// Subject area for synthetic data generation. Each domain carries a
/// built-in field schema used when the request brings no schema hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataDomain {
    Business,
    Health,
    Ecommerce,
    Nlp,
}

impl DataDomain {
    pub const ALL: [DataDomain; 4] = [
        DataDomain::Business,
        DataDomain::Health,
        DataDomain::Ecommerce,
        DataDomain::Nlp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataDomain::Business => "business",
            DataDomain::Health => "health",
            DataDomain::Ecommerce => "ecommerce",
            DataDomain::Nlp => "nlp",
        }
    }

    pub fn default_schema(&self) -> &'static [&'static str] {
        match self {
            DataDomain::Business => &[
                "company_id",
                "name",
                "industry",
                "revenue",
                "employees",
                "location",
                "founded_year",
            ],
            DataDomain::Health => &[
                "patient_id",
                "age",
                "gender",
                "diagnosis",
                "treatment",
                "admission_date",
                "discharge_date",
            ],
            DataDomain::Ecommerce => &[
                "order_id",
                "customer_id",
                "product",
                "quantity",
                "price",
                "order_date",
                "shipping_address",
            ],
            DataDomain::Nlp => &["text_id", "text", "label", "language", "source"],
        }
    }
}

impl fmt::Display for DataDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataDomain {
    type Err = TutorgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "business" => Ok(DataDomain::Business),
            "health" => Ok(DataDomain::Health),
            "ecommerce" | "e-commerce" => Ok(DataDomain::Ecommerce),
            "nlp" => Ok(DataDomain::Nlp),
            other => Err(TutorgenError::config(format!(
                "Unsupported domain '{}'. Supported domains: business, health, ecommerce, nlp",
                other
            ))),
        }
    }
}

/// External LLM service a model is hosted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The models users can pick. Each maps to a provider and a wire id; the
/// open-weight ones are served through a local Ollama daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    Gpt4oMini,
    ClaudeSonnet,
    Llama,
    Phi3,
    Gemma,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Gpt4oMini,
        ModelKind::ClaudeSonnet,
        ModelKind::Llama,
        ModelKind::Phi3,
        ModelKind::Gemma,
    ];

    pub fn provider(&self) -> Provider {
        match self {
            ModelKind::Gpt4oMini => Provider::OpenAi,
            ModelKind::ClaudeSonnet => Provider::Anthropic,
            ModelKind::Llama | ModelKind::Phi3 | ModelKind::Gemma => Provider::Ollama,
        }
    }

    /// Model id as the provider API expects it.
    pub fn wire_id(&self) -> &'static str {
        match self {
            ModelKind::Gpt4oMini => "gpt-4o-mini",
            ModelKind::ClaudeSonnet => "claude-3-5-sonnet-latest",
            ModelKind::Llama => "llama3.2",
            ModelKind::Phi3 => "phi3",
            ModelKind::Gemma => "gemma2",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Gpt4oMini => "gpt",
            ModelKind::ClaudeSonnet => "claude",
            ModelKind::Llama => "llama",
            ModelKind::Phi3 => "phi3",
            ModelKind::Gemma => "gemma",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = TutorgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gpt" | "gpt-4o-mini" | "openai" => Ok(ModelKind::Gpt4oMini),
            "claude" | "claude-3-5-sonnet-latest" | "anthropic" => Ok(ModelKind::ClaudeSonnet),
            "llama" | "llama3.2" => Ok(ModelKind::Llama),
            "phi3" | "phi-3" => Ok(ModelKind::Phi3),
            "gemma" | "gemma2" => Ok(ModelKind::Gemma),
            other => Err(TutorgenError::config(format!(
                "Unsupported model '{}'. Supported models: gpt, claude, llama, phi3, gemma",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = TutorgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "parquet" => Ok(OutputFormat::Parquet),
            other => Err(TutorgenError::config(format!(
                "Unsupported output format '{}'. Supported formats: json, csv, parquet",
                other
            ))),
        }
    }
}

/// One schema-hint entry: field name plus a loose type description that is
/// only ever interpolated into the prompt, never enforced on values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHint {
    pub name: String,
    pub hint: String,
}

impl FieldHint {
    pub fn new(name: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: hint.into(),
        }
    }
}

/// Immutable description of one generation run, built from the UI/CLI
/// inputs and discarded when the pipeline finishes.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub domain: DataDomain,
    pub model: ModelKind,
    pub sample_count: usize,
    pub output_format: OutputFormat,
    pub schema_hint: Option<Vec<FieldHint>>,
}

impl GenerationRequest {
    /// Field names for this request, in output order. A schema hint
    /// overrides the domain's built-in schema entirely.
    pub fn schema_fields(&self) -> Vec<String> {
        match &self.schema_hint {
            Some(hints) => hints.iter().map(|h| h.name.clone()).collect(),
            None => self
                .domain
                .default_schema()
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

/// Raw text returned by one provider call. Owned by the parser once the
/// adapter hands it over.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub raw_text: String,
    pub provider: Provider,
}

/// Parsed records. Every row carries exactly the fields in `schema`, in
/// schema order; rows the parser had to discard are counted in `dropped`.
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub schema: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub dropped: usize,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Where a finished generation run landed. Written once, never mutated.
/// Carries the lossy-tolerance summary so callers can report it.
#[derive(Debug, Clone, Serialize)]
pub struct OutputArtifact {
    pub path: String,
    pub format: OutputFormat,
    pub rows_written: usize,
    pub rows_dropped: usize,
}
