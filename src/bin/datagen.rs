use clap::Parser;

use tutorgen::providers::client_for;
use tutorgen::utils::{logger, validation::Validate};
use tutorgen::{
    Credentials, DatagenCli, GenerationEngine, GenerationPipeline, LocalStorage, TutorgenError,
};

fn bail(e: &TutorgenError) -> ! {
    tracing::error!(
        "❌ Generation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    let cli = DatagenCli::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("🚀 Starting synthetic data generation");
    if let Some(config_path) = &cli.config {
        tracing::info!("📁 Loading configuration from: {}", config_path);
    }

    let (request, settings) = match cli.resolve() {
        Ok(resolved) => resolved,
        Err(e) => bail(&e),
    };

    let credentials = Credentials::from_env();
    if let Err(e) = credentials.validate() {
        bail(&e);
    }

    let client = match client_for(request.model, &credentials) {
        Ok(client) => client,
        Err(e) => bail(&e),
    };

    tracing::info!(
        "🧠 Model: {} via {} | domain: {} | samples: {} | format: {}",
        request.model,
        request.model.provider(),
        request.domain,
        request.sample_count,
        request.output_format
    );

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(settings.output_path.clone());
    let pipeline = GenerationPipeline::new(storage, settings, request, client);
    let engine = GenerationEngine::new_with_monitoring(pipeline, cli.monitor);

    match engine.run().await {
        Ok(artifact) => {
            tracing::info!("✅ Generation completed successfully");
            println!(
                "✅ Generated {} records ({} dropped)",
                artifact.rows_written, artifact.rows_dropped
            );
            println!("📁 Output saved to: {}", artifact.path);
        }
        Err(e) => bail(&e),
    }
}
