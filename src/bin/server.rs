use anyhow::Context;

use tutorgen::server::{router, AppState};
use tutorgen::utils::logger;
use tutorgen::utils::validation::Validate;
use tutorgen::{Credentials, DatagenSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_server_logger();

    let credentials = Credentials::from_env();
    credentials
        .validate()
        .context("Invalid provider endpoint configuration")?;

    if credentials.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set - OpenAI models will be unavailable");
    }
    if credentials.anthropic_api_key.is_none() {
        tracing::warn!("ANTHROPIC_API_KEY not set - Claude will be unavailable");
    }

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let state = AppState::new(credentials, DatagenSettings::default());
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("tutorgen API listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
