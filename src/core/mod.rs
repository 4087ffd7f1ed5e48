pub mod engine;
pub mod parser;
pub mod pipeline;
pub mod writer;

pub use crate::domain::model::{
    DataDomain, FieldHint, GenerationRequest, ModelKind, ModelReply, OutputArtifact, OutputFormat,
    Provider, RecordSet,
};
pub use crate::domain::ports::{ChatRequest, ConfigProvider, ModelClient, Pipeline, Storage};
pub use crate::utils::error::Result;
