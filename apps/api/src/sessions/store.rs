//! In-memory session store.
//!
//! Sessions live for the process lifetime and are never explicitly
//! destroyed. Mutation is read-modify-write: callers `get` a working copy,
//! apply the turn, and `save` back as an idempotent overwrite. Requests for
//! different session ids are fully independent.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::Session;

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Session {
        let session = Session::new();
        self.inner
            .write()
            .await
            .insert(session.session_id, session.clone());
        session
    }

    pub async fn get(&self, session_id: Uuid) -> Result<Session, AppError> {
        self.inner
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
    }

    pub async fn save(&self, session: Session) {
        self.inner
            .write()
            .await
            .insert(session.session_id, session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::state_machine::Stage;

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let store = SessionStore::new();
        let session = store.create().await;

        let loaded = store.get(session.session_id).await.unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn test_get_unknown_session_is_not_found() {
        let store = SessionStore::new();
        let err = store.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_is_idempotent_overwrite() {
        let store = SessionStore::new();
        let mut session = store.create().await;

        session.stage = Stage::CollectExperience;
        session.push_user_turn("Jane Smith");
        store.save(session.clone()).await;
        store.save(session.clone()).await;

        let loaded = store.get(session.session_id).await.unwrap();
        assert_eq!(loaded.stage, Stage::CollectExperience);
        assert_eq!(loaded.turns.len(), 1);
    }
}
