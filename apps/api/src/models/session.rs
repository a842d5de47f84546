use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::verification::state_machine::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Agent,
}

/// One conversation turn. Append-only; ordering = conversation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub speaker: Speaker,
    pub text: String,
    /// Filename of the synthesized audio artifact, if synthesis succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

/// Identity fields collected so far. An option is `Some` only once the
/// matching question has been asked and answered with a well-formed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Company the caller gave during the verification turn, when it was
    /// not a plain yes/no confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stated_company: Option<String>,
}

/// One end-to-end verification conversation. Mutated by each chat turn and
/// written back to the session store as an idempotent overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: Uuid,
    pub stage: Stage,
    pub fields: CollectedFields,
    pub turns: Vec<TurnRecord>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            session_id: Uuid::new_v4(),
            stage: Stage::CollectName,
            fields: CollectedFields::default(),
            turns: Vec::new(),
            verified: false,
            created_at: Utc::now(),
        }
    }

    pub fn push_user_turn(&mut self, text: impl Into<String>) {
        self.turns.push(TurnRecord {
            speaker: Speaker::User,
            text: text.into(),
            audio: None,
        });
    }

    pub fn push_agent_turn(&mut self, text: impl Into<String>, audio: Option<String>) {
        self.turns.push(TurnRecord {
            speaker: Speaker::Agent,
            text: text.into(),
            audio,
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
