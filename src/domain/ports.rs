use crate::domain::model::{ModelReply, OutputArtifact, Provider, RecordSet};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Generation settings the pipeline reads, regardless of whether they came
/// from CLI flags, a TOML file, or an HTTP request body.
pub trait ConfigProvider: Send + Sync {
    fn max_tokens(&self) -> u32;
    fn batch_size(&self) -> usize;
    fn output_path(&self) -> &str;
    fn filename_prefix(&self) -> &str;
}

/// One completion request. The system prompt travels separately from the
/// user prompt because OpenAI and Anthropic take it out-of-band.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system: Option<&'a str>,
    pub prompt: &'a str,
    pub max_tokens: u32,
}

/// Uniform call surface over the heterogeneous provider APIs. One outbound
/// network call per invocation, no caching, no retries.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String>;

    fn provider(&self) -> Provider;
}

/// The generation pipeline stages, run strictly in order by the engine:
/// generate (prompt + provider calls) -> parse -> write.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn generate(&self) -> Result<Vec<ModelReply>>;

    fn parse(&self, replies: Vec<ModelReply>) -> Result<RecordSet>;

    async fn write(&self, records: RecordSet) -> Result<OutputArtifact>;
}
