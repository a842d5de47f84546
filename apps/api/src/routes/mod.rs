pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::dialogue::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/session/create", post(handlers::handle_create_session))
        .route("/api/session/:session_id", get(handlers::handle_get_session))
        .route("/api/chat", post(handlers::handle_chat))
        .route(
            "/api/audio/:filename",
            get(handlers::handle_get_audio).delete(handlers::handle_delete_audio),
        )
        .route("/api/transcripts", get(handlers::handle_list_transcripts))
        .route(
            "/api/transcript/:session_id",
            get(handlers::handle_get_transcript),
        )
        .with_state(state)
}
