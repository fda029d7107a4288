//! Conversation turn types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::IntentLabel;

/// Role in a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// User/customer utterance
    User,
    /// Assistant reply
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }

    /// Speaker prefix used when rendering generation context
    pub fn context_prefix(&self) -> &'static str {
        match self {
            TurnRole::User => "User",
            TurnRole::Assistant => "AI",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single turn in the conversation
///
/// A turn is sealed before it is appended to history and never mutated
/// afterwards. History holds working-language text only; translation
/// and audio belong to the turn's pipeline result, not to history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Unique turn id
    pub id: Uuid,
    /// Role of the speaker
    pub role: TurnRole,
    /// Original text (transcript for user turns, generated text for
    /// assistant turns)
    pub raw_text: String,
    /// Detected intent, for user turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentLabel>,
    /// When the turn occurred
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: TurnRole, raw_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            raw_text: raw_text.into(),
            intent: None,
            created_at: Utc::now(),
        }
    }

    /// Create a user turn
    pub fn user(raw_text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, raw_text)
    }

    /// Create an assistant turn
    pub fn assistant(raw_text: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, raw_text)
    }

    /// Attach the detected intent
    pub fn with_intent(mut self, intent: IntentLabel) -> Self {
        self.intent = Some(intent);
        self
    }

    /// Render this turn as one generation-context line
    pub fn context_line(&self) -> String {
        format!("{}: {}", self.role.context_prefix(), self.raw_text)
    }
}
