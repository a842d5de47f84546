use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Panics at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub tts_endpoint: String,
    pub tts_api_key: Option<String>,
    pub tts_voice: String,
    pub records_path: String,
    pub transcript_dir: String,
    pub audio_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            tts_endpoint: require_env("TTS_ENDPOINT")?,
            tts_api_key: std::env::var("TTS_API_KEY").ok(),
            tts_voice: std::env::var("TTS_VOICE").unwrap_or_else(|_| "en-US-female".to_string()),
            records_path: std::env::var("RECORDS_PATH")
                .unwrap_or_else(|_| "static/records.json".to_string()),
            transcript_dir: std::env::var("TRANSCRIPT_DIR")
                .unwrap_or_else(|_| "output".to_string()),
            audio_dir: std::env::var("AUDIO_DIR").unwrap_or_else(|_| "temp_audio".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
