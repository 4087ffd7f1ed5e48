use std::sync::Arc;

use crate::core::{parser, writer};
use crate::domain::model::{GenerationRequest, ModelReply, OutputArtifact, RecordSet};
use crate::domain::ports::{ChatRequest, ConfigProvider, ModelClient, Pipeline, Storage};
use crate::prompt::{build_generation_prompt, DATAGEN_SYSTEM_PROMPT};
use crate::utils::error::Result;

/// The synthetic-data pipeline: prompt -> provider -> parser -> writer,
/// owned entirely by one request. Large sample counts are split into
/// batches so a single reply stays within the model's output window.
pub struct GenerationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    request: GenerationRequest,
    client: Arc<dyn ModelClient>,
}

impl<S: Storage, C: ConfigProvider> GenerationPipeline<S, C> {
    pub fn new(
        storage: S,
        config: C,
        request: GenerationRequest,
        client: Arc<dyn ModelClient>,
    ) -> Self {
        Self {
            storage,
            config,
            request,
            client,
        }
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for GenerationPipeline<S, C> {
    async fn generate(&self) -> Result<Vec<ModelReply>> {
        let batch_size = self.config.batch_size().max(1);
        let total = self.request.sample_count;
        let total_batches = total.div_ceil(batch_size);

        let mut replies = Vec::with_capacity(total_batches);
        let mut remaining = total;

        while remaining > 0 {
            let count = remaining.min(batch_size);
            tracing::debug!(
                "Requesting batch {}/{} ({} records) from {}",
                replies.len() + 1,
                total_batches,
                count,
                self.client.provider()
            );

            let prompt = build_generation_prompt(
                self.request.domain,
                count,
                self.request.schema_hint.as_deref(),
            );
            let raw_text = self
                .client
                .complete(ChatRequest {
                    system: Some(DATAGEN_SYSTEM_PROMPT),
                    prompt: &prompt,
                    max_tokens: self.config.max_tokens(),
                })
                .await?;

            replies.push(ModelReply {
                raw_text,
                provider: self.client.provider(),
            });
            remaining -= count;
        }

        Ok(replies)
    }

    fn parse(&self, replies: Vec<ModelReply>) -> Result<RecordSet> {
        let schema = self.request.schema_fields();
        let mut records = parser::parse_records(&replies, &schema)?;

        // The requested count is a ceiling; an over-eager model gets cut
        // back, a shortfall is passed through as-is.
        if records.rows.len() > self.request.sample_count {
            tracing::warn!(
                "Model supplied {} rows, truncating to the requested {}",
                records.rows.len(),
                self.request.sample_count
            );
            records.rows.truncate(self.request.sample_count);
        }

        Ok(records)
    }

    async fn write(&self, records: RecordSet) -> Result<OutputArtifact> {
        let format = self.request.output_format;
        let data = writer::write_records(&records, format)?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!(
            "{}_{}.{}",
            self.config.filename_prefix(),
            timestamp,
            format.extension()
        );

        tracing::debug!("Writing {} bytes to {}", data.len(), filename);
        self.storage.write_file(&filename, &data).await?;

        let path = format!(
            "{}/{}",
            self.config.output_path().trim_end_matches('/'),
            filename
        );

        Ok(OutputArtifact {
            path,
            format,
            rows_written: records.len(),
            rows_dropped: records.dropped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DataDomain, FieldHint, ModelKind, OutputFormat, Provider};
    use crate::utils::error::TutorgenError;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn single_file(&self) -> (String, Vec<u8>) {
            let files = self.files.lock().await;
            assert_eq!(files.len(), 1);
            let (name, data) = files.iter().next().unwrap();
            (name.clone(), data.clone())
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                TutorgenError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        batch_size: usize,
    }

    impl ConfigProvider for MockConfig {
        fn max_tokens(&self) -> u32 {
            1000
        }

        fn batch_size(&self) -> usize {
            self.batch_size
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn filename_prefix(&self) -> &str {
            "synthetic"
        }
    }

    struct MockClient {
        replies: Mutex<VecDeque<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockClient {
        fn new(replies: Vec<&str>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().map(String::from).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        async fn prompts(&self) -> Vec<String> {
            self.prompts.lock().await.clone()
        }
    }

    #[async_trait]
    impl ModelClient for MockClient {
        async fn complete(&self, request: ChatRequest<'_>) -> Result<String> {
            self.prompts.lock().await.push(request.prompt.to_string());
            self.replies
                .lock()
                .await
                .pop_front()
                .ok_or_else(|| TutorgenError::ProviderUnavailable {
                    provider: "mock".to_string(),
                    reason: "no scripted reply left".to_string(),
                })
        }

        fn provider(&self) -> Provider {
            Provider::OpenAi
        }
    }

    fn request(sample_count: usize, format: OutputFormat) -> GenerationRequest {
        GenerationRequest {
            domain: DataDomain::Business,
            model: ModelKind::Gpt4oMini,
            sample_count,
            output_format: format,
            schema_hint: Some(vec![
                FieldHint::new("name", "string"),
                FieldHint::new("age", "integer"),
            ]),
        }
    }

    fn pipeline(
        sample_count: usize,
        batch_size: usize,
        replies: Vec<&str>,
    ) -> (
        GenerationPipeline<MockStorage, MockConfig>,
        MockStorage,
        Arc<MockClient>,
    ) {
        let storage = MockStorage::new();
        let client = Arc::new(MockClient::new(replies));
        let p = GenerationPipeline::new(
            storage.clone(),
            MockConfig { batch_size },
            request(sample_count, OutputFormat::Json),
            client.clone(),
        );
        (p, storage, client)
    }

    #[tokio::test]
    async fn test_generate_splits_into_batches() {
        let rows = r#"[{"name":"A","age":1}]"#;
        let (p, _storage, client) = pipeline(25, 10, vec![rows, rows, rows]);

        let replies = p.generate().await.unwrap();
        assert_eq!(replies.len(), 3);

        let prompts = client.prompts().await;
        assert!(prompts[0].contains("EXACTLY 10"));
        assert!(prompts[1].contains("EXACTLY 10"));
        assert!(prompts[2].contains("EXACTLY 5"));
    }

    #[tokio::test]
    async fn test_single_batch_for_small_requests() {
        let rows = r#"[{"name":"A","age":1}]"#;
        let (p, _storage, client) = pipeline(3, 10, vec![rows]);

        let replies = p.generate().await.unwrap();
        assert_eq!(replies.len(), 1);
        assert!(client.prompts().await[0].contains("EXACTLY 3"));
    }

    #[tokio::test]
    async fn test_parse_truncates_over_delivery() {
        let (p, _storage, _client) = pipeline(2, 10, vec![]);
        let reply = ModelReply {
            raw_text: r#"[{"name":"A","age":1},{"name":"B","age":2},{"name":"C","age":3}]"#
                .to_string(),
            provider: Provider::OpenAi,
        };

        let records = p.parse(vec![reply]).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_parse_tolerates_shortfall() {
        let (p, _storage, _client) = pipeline(10, 10, vec![]);
        let reply = ModelReply {
            raw_text: r#"[{"name":"A","age":1}]"#.to_string(),
            provider: Provider::OpenAi,
        };

        let records = p.parse(vec![reply]).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_write_lands_in_storage_with_format_extension() {
        let (p, storage, _client) = pipeline(1, 10, vec![]);
        let records = p
            .parse(vec![ModelReply {
                raw_text: r#"[{"name":"A","age":1}]"#.to_string(),
                provider: Provider::OpenAi,
            }])
            .unwrap();

        let artifact = p.write(records).await.unwrap();
        assert!(artifact.path.starts_with("test_output/synthetic_"));
        assert!(artifact.path.ends_with(".json"));
        assert_eq!(artifact.rows_written, 1);

        let (name, data) = storage.single_file().await;
        assert!(name.ends_with(".json"));
        let back: serde_json::Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(back[0]["name"], "A");
    }

    #[tokio::test]
    async fn test_unparseable_replies_fail_the_parse_stage() {
        let (p, _storage, _client) = pipeline(1, 10, vec![]);
        let reply = ModelReply {
            raw_text: "I'd rather not.".to_string(),
            provider: Provider::OpenAi,
        };

        let err = p.parse(vec![reply]).unwrap_err();
        assert!(matches!(err, TutorgenError::Parse { .. }));
    }
}
