// ./cli/src/main.rs
mod commands;
mod config;

use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use application::DocumentService;
use infrastructure::InMemoryDocumentRepository;

use crate::commands::{handle_line, render_response};
use crate::config::{Config, LogFormat};

// Application entry point
#[tokio::main]
async fn main() {
    // --- Logger Initialization ---
    init_logging(Config::log_format_from_env());
    let config = Config::from_env();
    info!(
        log_format = ?config.log_format,
        pretty_output = config.pretty_output,
        "Logger initialized successfully."
    );

    // --- Dependency Injection ---
    let document_repository = Arc::new(InMemoryDocumentRepository::new());
    let document_service = DocumentService::new(document_repository);
    info!("Document store initialized, reading commands from stdin.");

    // --- Command Loop ---
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut processed = 0usize;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                std::process::exit(1);
            }
        };
        let Some(response) = handle_line(&document_service, &line).await else {
            continue;
        };
        processed += 1;

        let rendered = render_response(&response, config.pretty_output);
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", rendered).and_then(|_| stdout.flush()) {
            error!("Failed to write response: {}", e);
            std::process::exit(1);
        }
    }
    info!(processed, "End of input reached, shutting down.");
}

/// Logs go to stderr so stdout carries only responses.
fn init_logging(format: LogFormat) {
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
