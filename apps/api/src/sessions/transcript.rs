//! Per-session transcript files.
//!
//! One JSON file per session under the configured output directory,
//! rewritten after each completed turn. Turns are append-only within the
//! session, so the file always holds the full ordered conversation.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::{CollectedFields, Session, TurnRecord};
use crate::verification::state_machine::Stage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub session_id: Uuid,
    pub stage: Stage,
    pub verified: bool,
    pub fields: CollectedFields,
    pub turns: Vec<TurnRecord>,
    pub created_at: DateTime<Utc>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating transcript directory {}", dir.display()))?;
        Ok(TranscriptStore { dir })
    }

    pub async fn save(&self, session: &Session) -> Result<(), AppError> {
        let transcript = Transcript {
            session_id: session.session_id,
            stage: session.stage,
            verified: session.verified,
            fields: session.fields.clone(),
            turns: session.turns.clone(),
            created_at: session.created_at,
            saved_at: Utc::now(),
        };

        let path = self.path_for(session.session_id);
        let body = serde_json::to_vec_pretty(&transcript).context("serializing transcript")?;
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("writing transcript {}", path.display()))?;
        Ok(())
    }

    /// Session identifiers with a persisted transcript, sorted.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("listing transcripts in {}", self.dir.display()))?;

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.context("reading dir entry")? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(id) = name.strip_suffix(".json") {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub async fn load(&self, session_id: Uuid) -> Result<Transcript, AppError> {
        let path = self.path_for(session_id);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "Transcript for session {session_id} not found"
                )));
            }
            Err(e) => {
                return Err(anyhow::Error::from(e)
                    .context(format!("reading transcript {}", path.display()))
                    .into());
            }
        };

        let transcript =
            serde_json::from_slice(&raw).context("parsing persisted transcript")?;
        Ok(transcript)
    }

    fn path_for(&self, session_id: Uuid) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }
}
