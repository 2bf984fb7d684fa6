use std::sync::Arc;

mod config;
mod error;
mod gemini;
mod models;
mod tutor;
mod web;

use config::Config;
use gemini::GeminiClient;
use tutor::AnswerGenerator;
use web::AppState;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may already be set.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(?config, "configuration loaded");

    let client = match GeminiClient::new(config.api_key.clone(), config.api_base.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("failed to configure Gemini API client: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        generator: AnswerGenerator::new(Arc::new(client), config.model_name.clone()),
    };
    let app = web::router(state);

    let listener = match tokio::net::TcpListener::bind(config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("listening on {}", config.listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}
