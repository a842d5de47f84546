use std::sync::Arc;

use crate::dialogue::orchestrator::Orchestrator;

/// Shared application state injected into all route handlers via Axum
/// extractors. The orchestrator owns the external collaborators (chat
/// completion, speech synthesis, record store) and the session, transcript,
/// and audio stores.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}
