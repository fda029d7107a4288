//! Turn orchestrator
//!
//! Drives one recorded utterance through the full pipeline. Stage
//! ordering is fixed: transcribe, classify, route, then either the
//! loan-form short-circuit or generate, translate, synthesize. Each
//! remote call runs under a stage timeout; classification alone never
//! fails the turn.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use loan_advisor_core::{
    AudioClip, BranchDecision, IntentLabel, IntentModel, PipelineResult, ResponseGenerator,
    ServiceError, SpeechSynthesizer, Stage, StageError, Transcriber, Transcription, Translator,
    Turn,
};

use crate::classify::IntentResolver;
use crate::history::ConversationBuffer;
use crate::router::IntentRouter;

/// Orchestrator tuning knobs
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Turns retained as generation context
    pub history_capacity: usize,
    /// Whether `loanApplication` bypasses the conversational branch
    pub short_circuit_loan_form: bool,
    /// Upper bound on each remote call
    pub stage_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            history_capacity: crate::history::DEFAULT_CAPACITY,
            short_circuit_loan_form: true,
            stage_timeout: Duration::from_secs(30),
        }
    }
}

/// Per-session pipeline driver
///
/// Owns the session's conversation buffer. A reset during an in-flight
/// turn bumps the epoch, and the stale turn finishes without touching
/// the cleared buffer.
pub struct TurnOrchestrator {
    transcriber: Arc<dyn Transcriber>,
    intent_model: Arc<dyn IntentModel>,
    generator: Arc<dyn ResponseGenerator>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    resolver: IntentResolver,
    router: IntentRouter,
    history: ConversationBuffer,
    stage_timeout: Duration,
    epoch: AtomicU64,
}

impl TurnOrchestrator {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        intent_model: Arc<dyn IntentModel>,
        generator: Arc<dyn ResponseGenerator>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            transcriber,
            intent_model,
            generator,
            translator,
            synthesizer,
            resolver: IntentResolver::default(),
            router: IntentRouter::new(config.short_circuit_loan_form),
            history: ConversationBuffer::new(config.history_capacity),
            stage_timeout: config.stage_timeout,
            epoch: AtomicU64::new(0),
        }
    }

    /// Process one recorded utterance end to end
    pub async fn process_turn(&self, audio: &AudioClip) -> Result<PipelineResult, StageError> {
        let epoch = self.epoch.load(Ordering::SeqCst);

        let transcription = self.transcribe(audio).await?;
        tracing::info!(
            language = %transcription.language,
            chars = transcription.text.len(),
            "transcription complete"
        );

        let intent = self.classify(&transcription.text).await;
        tracing::info!(intent = %intent, "intent resolved");

        if self.router.route(intent) == BranchDecision::ShortCircuitLoanForm {
            tracing::info!("short-circuiting to loan form");
            return Ok(PipelineResult::short_circuit(
                transcription.text,
                transcription.language,
            ));
        }

        self.run_conversational_branch(epoch, transcription, intent)
            .await
    }

    /// Clear the history and invalidate in-flight turns
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.history.clear();
        tracing::info!("conversation reset");
    }

    pub fn history(&self) -> &ConversationBuffer {
        &self.history
    }

    async fn transcribe(&self, audio: &AudioClip) -> Result<Transcription, StageError> {
        let service = self.transcriber.service_name();
        self.guarded(Stage::Transcribing, service, self.transcriber.transcribe(audio))
            .await
    }

    /// Classify the transcript; never fails
    ///
    /// A model error or timeout resolves through the fallback chain
    /// with no model output.
    async fn classify(&self, transcript: &str) -> IntentLabel {
        let model_output =
            match tokio::time::timeout(self.stage_timeout, self.intent_model.classify(transcript))
                .await
            {
                Ok(Ok(output)) => Some(output),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "intent model failed, falling back");
                    None
                }
                Err(_) => {
                    tracing::warn!(
                        service = self.intent_model.service_name(),
                        "intent model timed out, falling back"
                    );
                    None
                }
            };

        self.resolver.resolve(model_output.as_deref(), transcript)
    }

    async fn run_conversational_branch(
        &self,
        epoch: u64,
        transcription: Transcription,
        intent: IntentLabel,
    ) -> Result<PipelineResult, StageError> {
        let language = transcription.language;
        let user_turn = Turn::user(transcription.text.clone()).with_intent(intent);

        // A stale turn (reset happened mid-flight) still gets a reply,
        // but its turns never land in the cleared buffer.
        let context = if self.is_current(epoch) {
            self.history.append(user_turn);
            self.history.render_context()
        } else {
            tracing::warn!("turn is stale after reset, history untouched");
            user_turn.context_line()
        };

        let generated = self
            .guarded(
                Stage::Generating,
                self.generator.service_name(),
                self.generator.generate(&context),
            )
            .await?;

        if self.is_current(epoch) {
            self.history.append(Turn::assistant(generated.clone()));
        }

        // Translation failure is terminal for the turn; the assistant
        // turn above stays in history untranslated.
        let translated = self
            .guarded(
                Stage::Translating,
                self.translator.service_name(),
                self.translator.translate(&generated, language),
            )
            .await?;

        // Synthesis failure degrades to a text-only reply.
        let audio = match self
            .guarded(
                Stage::Synthesizing,
                self.synthesizer.service_name(),
                self.synthesizer.synthesize(&translated, language),
            )
            .await
        {
            Ok(clip) => Some(clip),
            Err(e) => {
                tracing::warn!(error = %e, "synthesis failed, returning text-only reply");
                None
            }
        };

        Ok(PipelineResult {
            transcript_text: transcription.text,
            detected_intent: intent,
            response_text: Some(translated),
            response_audio: audio,
            language,
        })
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    async fn guarded<T, F>(
        &self,
        stage: Stage,
        service: &'static str,
        call: F,
    ) -> Result<T, StageError>
    where
        F: std::future::Future<Output = Result<T, ServiceError>>,
    {
        match tokio::time::timeout(self.stage_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(StageError::new(stage, e)),
            Err(_) => Err(StageError::new(
                stage,
                ServiceError::unreachable(service, "stage timeout elapsed"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.history_capacity, 10);
        assert!(config.short_circuit_loan_form);
        assert_eq!(config.stage_timeout, Duration::from_secs(30));
    }

}
