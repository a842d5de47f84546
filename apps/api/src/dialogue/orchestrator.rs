//! Dialogue orchestrator.
//!
//! Drives one verification conversation turn end to end: validates the
//! answer against the stage's expected field, applies the state machine to
//! a working copy of the session, has the chat-completion collaborator
//! phrase the next utterance, synthesizes audio for it, and persists the
//! session and its transcript.
//!
//! Failure semantics: a chat-completion failure aborts the turn BEFORE the
//! working copy is saved, so the stored session is untouched and the same
//! turn can be retried. A speech-synthesis failure never rolls the turn
//! back; the reply is returned text-only with `audio_available = false`.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{ChatMessage, ChatModel};
use crate::models::session::{Session, Speaker, TurnRecord};
use crate::records::EmploymentStore;
use crate::sessions::audio::AudioStore;
use crate::sessions::store::SessionStore;
use crate::sessions::transcript::TranscriptStore;
use crate::speech::SpeechSynthesizer;
use crate::verification::matcher;
use crate::verification::state_machine::{self, Stage, TurnTransition};

use super::prompts;

/// What one turn (or the session-creation greeting) produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: Uuid,
    pub agent_text: String,
    pub audio_ref: Option<String>,
    pub audio_available: bool,
    pub stage: Stage,
    pub suggestions: Option<Vec<String>>,
}

pub struct Orchestrator {
    records: Arc<dyn EmploymentStore>,
    chat: Arc<dyn ChatModel>,
    tts: Arc<dyn SpeechSynthesizer>,
    pub sessions: SessionStore,
    pub transcripts: TranscriptStore,
    pub audio: AudioStore,
}

impl Orchestrator {
    pub fn new(
        records: Arc<dyn EmploymentStore>,
        chat: Arc<dyn ChatModel>,
        tts: Arc<dyn SpeechSynthesizer>,
        sessions: SessionStore,
        transcripts: TranscriptStore,
        audio: AudioStore,
    ) -> Self {
        Orchestrator {
            records,
            chat,
            tts,
            sessions,
            transcripts,
            audio,
        }
    }

    /// Creates a session and speaks the scripted greeting.
    pub async fn create_session(&self) -> Result<TurnOutcome, AppError> {
        let mut session = self.sessions.create().await;
        info!("Session {} created", session.session_id);

        let (audio_ref, audio_available) =
            self.synthesize(session.session_id, prompts::GREETING).await;
        session.push_agent_turn(prompts::GREETING, audio_ref.clone());

        self.persist(session.clone()).await;

        Ok(TurnOutcome {
            session_id: session.session_id,
            agent_text: prompts::GREETING.to_string(),
            audio_ref,
            audio_available,
            stage: session.stage,
            suggestions: None,
        })
    }

    /// Processes one user message against the session's current stage.
    pub async fn chat_turn(&self, session_id: Uuid, message: &str) -> Result<TurnOutcome, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("message must not be empty".to_string()));
        }

        // Working copy: the stored session is only replaced after the chat
        // collaborator has produced the reply for this turn.
        let mut session = self.sessions.get(session_id).await?;

        let record = match session.stage {
            Stage::Verify => session
                .fields
                .email
                .as_deref()
                .and_then(|email| self.records.find(email)),
            _ => None,
        };

        let transition =
            state_machine::advance(session.stage, &mut session.fields, message, record.as_ref());

        let mut suggestions = None;
        let objective = match &transition {
            TurnTransition::Advanced(next) => {
                debug!(
                    "Session {session_id}: {:?} -> {next:?}",
                    session.stage
                );
                session.stage = *next;
                let known_company = match next {
                    Stage::Verify => session
                        .fields
                        .email
                        .as_deref()
                        .and_then(|email| self.records.find(email))
                        .map(|record| record.company_name),
                    _ => None,
                };
                prompts::collect_objective(*next, &session.fields, known_company.as_deref())
            }
            TurnTransition::Reprompt(error) => {
                debug!("Session {session_id}: re-prompting {:?} ({error})", session.stage);
                prompts::reprompt_objective(session.stage, error)
            }
            TurnTransition::Decision(decision) => {
                session.stage = if decision.verified {
                    Stage::Verified
                } else {
                    Stage::Rejected
                };
                session.verified = decision.verified;
                info!(
                    "Session {session_id}: verification {:?} ({})",
                    session.stage,
                    decision.reasons.join("; ")
                );

                if !decision.verified {
                    suggestions = session
                        .fields
                        .stated_company
                        .as_deref()
                        .map(|stated| {
                            matcher::closest_matches(
                                stated,
                                self.records.companies(),
                                matcher::SUGGESTION_CUTOFF,
                                matcher::MAX_SUGGESTIONS,
                            )
                        })
                        .filter(|matches| !matches.is_empty());
                }

                prompts::decision_objective(
                    decision,
                    &session.fields,
                    suggestions.as_deref().unwrap_or(&[]),
                )
            }
            TurnTransition::Closed => prompts::closed_objective(&session.fields),
        };

        let system = prompts::build_system_prompt(&objective);
        let mut history = build_messages(&session.turns);
        history.push(ChatMessage::user(message));

        let agent_text = self
            .chat
            .complete(&system, &history)
            .await
            .map_err(|e| {
                warn!("Chat completion failed for session {session_id}: {e}");
                AppError::ServiceUnavailable("chat completion".to_string())
            })?;

        let (audio_ref, audio_available) = self.synthesize(session_id, &agent_text).await;

        session.push_user_turn(message);
        session.push_agent_turn(&agent_text, audio_ref.clone());
        let stage = session.stage;
        self.persist(session).await;

        Ok(TurnOutcome {
            session_id,
            agent_text,
            audio_ref,
            audio_available,
            stage,
            suggestions,
        })
    }

    /// Synthesizes one utterance. Failures are downgraded to a text-only
    /// reply; they must not fail the turn.
    async fn synthesize(&self, session_id: Uuid, text: &str) -> (Option<String>, bool) {
        let audio = match self.tts.synthesize(text).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Speech synthesis failed for session {session_id}: {e}");
                return (None, false);
            }
        };

        match self.audio.save(session_id, &audio).await {
            Ok(filename) => (Some(filename), true),
            Err(e) => {
                warn!("Storing audio failed for session {session_id}: {e}");
                (None, false)
            }
        }
    }

    /// Saves the session and rewrites its transcript file. Transcript I/O
    /// errors are logged, not surfaced: the in-memory state is already
    /// committed and the turn succeeded.
    async fn persist(&self, session: Session) {
        let session_id = session.session_id;
        self.sessions.save(session.clone()).await;
        if let Err(e) = self.transcripts.save(&session).await {
            warn!("Persisting transcript for session {session_id} failed: {e}");
        }
    }
}

/// Maps the stored turns onto chat-completion messages. The Messages API
/// requires the history to open with a user turn, so the scripted greeting
/// (and any other leading agent turns) are skipped; the per-stage objective
/// in the system prompt carries that context instead.
fn build_messages(turns: &[TurnRecord]) -> Vec<ChatMessage> {
    let start = turns
        .iter()
        .position(|turn| turn.speaker == Speaker::User)
        .unwrap_or(turns.len());

    turns[start..]
        .iter()
        .map(|turn| match turn.speaker {
            Speaker::User => ChatMessage::user(turn.text.clone()),
            Speaker::Agent => ChatMessage::assistant(turn.text.clone()),
        })
        .collect()
}
