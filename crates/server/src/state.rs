//! Application state
//!
//! Shared state across all handlers. The five provider clients are
//! built once at startup and shared; each session gets its own
//! orchestrator (and thus its own conversation buffer) around them.

use std::sync::Arc;
use std::time::Duration;

use loan_advisor_agent::{OrchestratorConfig, TurnOrchestrator};
use loan_advisor_clients::{
    GeminiConfig, GeminiGenerator, MistralClassifier, MistralConfig, SarvamStt, SarvamSttConfig,
    SarvamTranslator, SarvamTranslatorConfig, SarvamTts, SarvamTtsConfig,
};
use loan_advisor_config::Settings;
use loan_advisor_core::{
    IntentModel, ResponseGenerator, ServiceError, SpeechSynthesizer, Transcriber, Translator,
};

use crate::session::SessionManager;

/// Shared provider clients
#[derive(Clone)]
pub struct Services {
    pub transcriber: Arc<dyn Transcriber>,
    pub intent_model: Arc<dyn IntentModel>,
    pub generator: Arc<dyn ResponseGenerator>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl Services {
    /// Build the real clients from settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ServiceError> {
        let sarvam = &settings.services.sarvam;
        let sarvam_timeout = Duration::from_secs(sarvam.timeout_seconds);

        let transcriber = SarvamStt::new(SarvamSttConfig {
            endpoint: sarvam.endpoint.clone(),
            api_key: sarvam.api_key.clone(),
            model: sarvam.stt_model.clone(),
            timeout: sarvam_timeout,
        })?;

        let intent_model = MistralClassifier::new(MistralConfig {
            endpoint: settings.services.mistral.endpoint.clone(),
            api_key: settings.services.mistral.api_key.clone(),
            model: settings.services.mistral.model.clone(),
            temperature: settings.services.mistral.temperature,
            timeout: Duration::from_secs(settings.services.mistral.timeout_seconds),
        })?;

        let generator = GeminiGenerator::new(GeminiConfig {
            endpoint: settings.services.gemini.endpoint.clone(),
            api_key: settings.services.gemini.api_key.clone(),
            model: settings.services.gemini.model.clone(),
            system_instruction: settings.agent.system_instruction.clone(),
            timeout: Duration::from_secs(settings.services.gemini.timeout_seconds),
        })?;

        let translator = SarvamTranslator::new(SarvamTranslatorConfig {
            endpoint: sarvam.endpoint.clone(),
            api_key: sarvam.api_key.clone(),
            model: sarvam.translate_model.clone(),
            source_language: settings.agent.source_language,
            timeout: sarvam_timeout,
        })?;

        let synthesizer = SarvamTts::new(SarvamTtsConfig {
            endpoint: sarvam.endpoint.clone(),
            api_key: sarvam.api_key.clone(),
            audio_format: "wav".to_string(),
            sample_rate: sarvam.tts_sample_rate,
            timeout: sarvam_timeout,
        })?;

        Ok(Self {
            transcriber: Arc::new(transcriber),
            intent_model: Arc::new(intent_model),
            generator: Arc::new(generator),
            translator: Arc::new(translator),
            synthesizer: Arc::new(synthesizer),
        })
    }
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sessions: Arc<SessionManager>,
    services: Services,
}

impl AppState {
    pub fn new(settings: Settings, services: Services) -> Self {
        let sessions = Arc::new(SessionManager::new(
            settings.server.max_sessions,
            Duration::from_secs(settings.server.session_timeout_seconds),
        ));
        Self {
            settings: Arc::new(settings),
            sessions,
            services,
        }
    }

    /// Build state with real provider clients
    pub fn from_settings(settings: Settings) -> Result<Self, ServiceError> {
        let services = Services::from_settings(&settings)?;
        Ok(Self::new(settings, services))
    }

    /// Build a fresh orchestrator for a new session
    pub fn new_orchestrator(&self) -> TurnOrchestrator {
        TurnOrchestrator::new(
            self.services.transcriber.clone(),
            self.services.intent_model.clone(),
            self.services.generator.clone(),
            self.services.translator.clone(),
            self.services.synthesizer.clone(),
            OrchestratorConfig {
                history_capacity: self.settings.agent.history_capacity,
                short_circuit_loan_form: self.settings.agent.short_circuit_loan_form,
                stage_timeout: Duration::from_secs(self.settings.agent.stage_timeout_seconds),
            },
        )
    }
}
