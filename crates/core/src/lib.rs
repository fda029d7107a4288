//! Core traits and types for the loan advisory turn pipeline
//!
//! This crate provides foundational types used across all other crates:
//! - Service traits for the hosted providers (STT, intent, generation,
//!   translation, TTS)
//! - Language definitions with provider language codes
//! - Conversation turn types
//! - Intent labels and routing decisions
//! - Pipeline result and error types

pub mod conversation;
pub mod error;
pub mod intent;
pub mod language;
pub mod pipeline;
pub mod traits;

pub use conversation::{Turn, TurnRole};
pub use error::{ServiceError, ServiceErrorKind, StageError};
pub use intent::IntentLabel;
pub use language::Language;
pub use pipeline::{
    AudioClip, BranchDecision, PipelineResult, Stage, Transcription,
};
pub use traits::{
    IntentModel, ResponseGenerator, SpeechSynthesizer, Transcriber, Translator,
};

/// Convenience result alias for service calls
pub type Result<T> = std::result::Result<T, ServiceError>;
