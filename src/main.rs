use clap::Parser;
use std::io::Read;

use tutorgen::providers::client_for;
use tutorgen::tutor::TutorSession;
use tutorgen::utils::{logger, validation::Validate};
use tutorgen::{Credentials, TutorCli, TutorgenError};

fn bail(e: &TutorgenError) -> ! {
    tracing::error!(
        "❌ Tutor request failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TutorCli::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting tutorgen CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        bail(&e);
    }

    // Query comes from the argument, or stdin when piped in.
    let query = match &config.query {
        Some(query) => query.clone(),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    if query.trim().is_empty() {
        bail(&TutorgenError::config(
            "No query given. Pass it as an argument or pipe it on stdin",
        ));
    }

    let credentials = Credentials::from_env();
    if let Err(e) = credentials.validate() {
        bail(&e);
    }

    let model = match config.model.parse() {
        Ok(model) => model,
        Err(e) => bail(&e),
    };
    let answer_language = match config.answer_language.parse() {
        Ok(language) => language,
        Err(e) => bail(&e),
    };

    // Missing API keys surface here, before anything goes over the wire.
    let client = match client_for(model, &credentials) {
        Ok(client) => client,
        Err(e) => bail(&e),
    };

    tracing::info!("⏳ Asking {} ...", model);
    let session =
        TutorSession::new(client, config.max_tokens).with_answer_language(answer_language);

    match session.explain(&query, config.code, &config.language).await {
        Ok(markdown) => {
            println!("{}", markdown);
            Ok(())
        }
        Err(e) => bail(&e),
    }
}
