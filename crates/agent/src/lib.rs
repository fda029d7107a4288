//! Turn orchestration for the loan advisory pipeline
//!
//! One recorded utterance drives a fixed chain of remote calls:
//! transcribe, classify, then either the loan-form short-circuit or
//! generate, translate, synthesize. This crate owns that chain plus
//! the bounded conversation history it feeds to the generator.

pub mod classify;
pub mod history;
pub mod orchestrator;
pub mod router;

pub use classify::{
    ClassificationStrategy, DefaultLabel, ExactLabel, IntentResolver, KeywordHeuristic,
};
pub use history::ConversationBuffer;
pub use orchestrator::{OrchestratorConfig, TurnOrchestrator};
pub use router::IntentRouter;
