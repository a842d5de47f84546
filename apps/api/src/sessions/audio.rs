//! Temporary audio artifacts.
//!
//! Synthesized speech is written as `{session_id}_{8-hex}.mp3` under the
//! configured directory and served back by filename. Filenames are
//! validated before any path is built, so a crafted name cannot escape the
//! audio directory. Cleanup is explicit (DELETE endpoint), never a
//! background task.

use std::path::PathBuf;

use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating audio directory {}", dir.display()))?;
        Ok(AudioStore { dir })
    }

    /// Writes one audio artifact and returns its reference filename.
    pub async fn save(&self, session_id: Uuid, audio: &[u8]) -> Result<String, AppError> {
        let suffix = Uuid::new_v4().simple().to_string();
        let filename = format!("{session_id}_{}.mp3", &suffix[..8]);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, audio)
            .await
            .with_context(|| format!("writing audio file {}", path.display()))?;
        Ok(filename)
    }

    pub async fn load(&self, filename: &str) -> Result<Bytes, AppError> {
        let path = self.checked_path(filename)?;
        match tokio::fs::read(&path).await {
            Ok(raw) => Ok(Bytes::from(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(
                format!("Audio file {filename} not found"),
            )),
            Err(e) => Err(anyhow::Error::from(e)
                .context(format!("reading audio file {}", path.display()))
                .into()),
        }
    }

    /// Removes an artifact. Deleting an already-gone file is not an error.
    pub async fn delete(&self, filename: &str) -> Result<(), AppError> {
        let path = self.checked_path(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::from(e)
                .context(format!("deleting audio file {}", path.display()))
                .into()),
        }
    }

    /// Only plain `.mp3` basenames are valid references; anything that
    /// could traverse out of the audio directory is treated as unknown.
    fn checked_path(&self, filename: &str) -> Result<PathBuf, AppError> {
        let valid = filename.ends_with(".mp3")
            && !filename.contains('/')
            && !filename.contains('\\')
            && !filename.contains("..");
        if !valid {
            return Err(AppError::NotFound(format!(
                "Audio file {filename} not found"
            )));
        }
        Ok(self.dir.join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path()).await.unwrap();
        let session_id = Uuid::new_v4();

        let filename = store.save(session_id, b"ID3fake-mpeg-bytes").await.unwrap();
        assert!(filename.starts_with(&session_id.to_string()));
        assert!(filename.ends_with(".mp3"));

        let audio = store.load(&filename).await.unwrap();
        assert_eq!(audio.as_ref(), b"ID3fake-mpeg-bytes");
    }

    #[tokio::test]
    async fn test_load_unknown_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path()).await.unwrap();
        let err = store.load("missing.mp3").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_traversal_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path()).await.unwrap();

        for name in ["../etc/passwd.mp3", "a/b.mp3", "..\\x.mp3", "notes.txt"] {
            let err = store.load(name).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "{name}");
        }
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path()).await.unwrap();
        let filename = store.save(Uuid::new_v4(), b"bytes").await.unwrap();

        store.delete(&filename).await.unwrap();
        store.delete(&filename).await.unwrap();
        assert!(matches!(
            store.load(&filename).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
