mod config;
mod dialogue;
mod errors;
mod llm_client;
mod models;
mod records;
mod routes;
mod sessions;
mod speech;
mod state;
mod verification;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dialogue::orchestrator::Orchestrator;
use crate::llm_client::LlmClient;
use crate::records::JsonRecordStore;
use crate::routes::build_router;
use crate::sessions::audio::AudioStore;
use crate::sessions::store::SessionStore;
use crate::sessions::transcript::TranscriptStore;
use crate::speech::HttpSpeechClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vouch API v{}", env!("CARGO_PKG_VERSION"));

    // Load the read-only employment record store
    let records = Arc::new(JsonRecordStore::load(Path::new(&config.records_path))?);

    // Initialize external collaborators
    let chat = Arc::new(LlmClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let tts = Arc::new(HttpSpeechClient::new(
        config.tts_endpoint.clone(),
        config.tts_api_key.clone(),
        config.tts_voice.clone(),
    ));
    info!("Speech synthesis client initialized ({})", config.tts_endpoint);

    // Initialize session, transcript, and audio stores
    let sessions = SessionStore::new();
    let transcripts = TranscriptStore::new(&config.transcript_dir).await?;
    let audio = AudioStore::new(&config.audio_dir).await?;
    info!(
        "Stores ready (transcripts: {}, audio: {})",
        config.transcript_dir, config.audio_dir
    );

    let orchestrator = Arc::new(Orchestrator::new(
        records,
        chat,
        tts,
        sessions,
        transcripts,
        audio,
    ));

    let state = AppState { orchestrator };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the browser frontend is served elsewhere

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
