//! Turn pipeline types
//!
//! One user recording drives a fixed sequence of remote calls:
//! transcribe, classify, then either a loan-form short-circuit or the
//! conversational branch (generate, translate, synthesize). These are
//! the types shared between the orchestrator and its callers.

use serde::{Deserialize, Serialize};

use crate::intent::IntentLabel;
use crate::language::Language;

/// Named pipeline stage
///
/// Reported alongside any stage failure so the caller knows where the
/// turn stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Transcribing,
    Classifying,
    Generating,
    Translating,
    Synthesizing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Transcribing => "transcribing",
            Stage::Classifying => "classifying",
            Stage::Generating => "generating",
            Stage::Translating => "translating",
            Stage::Synthesizing => "synthesizing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Post-classification execution path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDecision {
    /// Return immediately with the intent signal; the presentation
    /// layer shows the loan-application form instead of a reply
    ShortCircuitLoanForm,
    /// Run generate, translate, synthesize
    RunConversationalBranch,
}

/// An opaque audio payload with its content type
///
/// Recorded user audio going in, synthesized reply audio coming out.
/// The bytes are never inspected locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    pub fn wav(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "audio/wav")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Transcription result from the speech-to-text provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    /// Transcript text, already translated to the pipeline's working
    /// language by the provider
    pub text: String,
    /// Language the user spoke
    pub language: Language,
}

/// Output of one full turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// What the user said
    pub transcript_text: String,
    /// Classified intent
    pub detected_intent: IntentLabel,
    /// Reply text in the user's language; absent when the turn
    /// short-circuited to the loan form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    /// Synthesized reply audio; absent on short-circuit and on
    /// synthesis failure (text without audio is a valid outcome)
    #[serde(skip)]
    pub response_audio: Option<AudioClip>,
    /// Language of the exchange
    pub language: Language,
}

impl PipelineResult {
    /// Result for the loan-form short-circuit
    pub fn short_circuit(transcript_text: impl Into<String>, language: Language) -> Self {
        Self {
            transcript_text: transcript_text.into(),
            detected_intent: IntentLabel::LoanApplication,
            response_text: None,
            response_audio: None,
            language,
        }
    }

    /// True when the conversational branch produced a reply
    pub fn has_response(&self) -> bool {
        self.response_text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_circuit_result() {
        let result = PipelineResult::short_circuit("apply please", Language::Hindi);
        assert_eq!(result.detected_intent, IntentLabel::LoanApplication);
        assert!(!result.has_response());
        assert!(result.response_audio.is_none());
    }

    #[test]
    fn test_audio_clip() {
        let clip = AudioClip::wav(vec![1, 2, 3]);
        assert_eq!(clip.len(), 3);
        assert_eq!(clip.content_type, "audio/wav");
    }
}
