use crate::domain::model::OutputArtifact;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Runs the pipeline stages strictly in order, with progress logging and
/// optional process monitoring around each stage.
pub struct GenerationEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> GenerationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<OutputArtifact> {
        tracing::info!("Starting generation pipeline...");

        tracing::info!("Calling model...");
        let replies = self.pipeline.generate().await?;
        tracing::info!("Collected {} model replies", replies.len());
        self.monitor.log_stats("generate");

        tracing::info!("Parsing records...");
        let records = self.pipeline.parse(replies)?;
        tracing::info!("Parsed {} records ({} dropped)", records.len(), records.dropped);
        self.monitor.log_stats("parse");

        tracing::info!("Writing output...");
        let artifact = self.pipeline.write(records).await?;
        tracing::info!("Output saved to: {}", artifact.path);
        self.monitor.log_final_stats();

        Ok(artifact)
    }
}
