//! TutorHub - university tutoring coordination client
//!
//! Terminal front end over the tutoring backend: booking for students,
//! availability and request handling for tutors, and per-class discussion.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tutorhub_core::ClientConfig;
use tutorhub_net::HttpClient;

mod console;
mod notify;
mod state;
mod viewmodel;

#[cfg(test)]
mod testing;

fn main() {
    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!(api = %config.api_base_url, "Starting TutorHub");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let client = match HttpClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to initialize HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    let app_state = state::AppState::new(Arc::new(client));

    if let Err(e) = runtime.block_on(console::run(app_state)) {
        tracing::error!("Console stopped: {}", e);
        std::process::exit(1);
    }
}
