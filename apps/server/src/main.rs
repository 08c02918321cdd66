mod error;
mod handlers;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use smartlearn_core::{
    Provider, SessionStore, TranscriptResolver, TutorClient, WhisperRecognizer, get_model_dir,
};

use crate::routes::create_router;
use crate::state::AppState;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,smartlearn=debug,tower_http=debug"));

    let json_format = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");
    if json_format {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

fn provider_from_env() -> Provider {
    match std::env::var("LLM_PROVIDER").as_deref() {
        Ok("openai") => Provider::Openai,
        Ok("grok") => Provider::Grok,
        _ => Provider::Gemini,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port: u16 = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    init_tracing();

    let provider = provider_from_env();
    provider.validate_api_key()?;

    let model_path = std::env::var("WHISPER_MODEL")
        .map(Into::into)
        .unwrap_or_else(|_| get_model_dir().join("ggml-base.en.bin"));
    let recognizer = Arc::new(WhisperRecognizer::new(model_path));

    let state = AppState::new(
        TranscriptResolver::with_default_strategies(recognizer),
        TutorClient::new(provider),
        SessionStore::default(),
    );

    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
