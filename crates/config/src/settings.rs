//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use loan_advisor_core::Language;

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Hosted service endpoints and credentials
    #[serde(default)]
    pub services: ServicesSettings,

    /// Turn orchestration configuration
    #[serde(default)]
    pub agent: AgentSettings,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.history_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.history_capacity".to_string(),
                message: "history capacity must be at least 1".to_string(),
            });
        }

        if self.agent.stage_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.stage_timeout_seconds".to_string(),
                message: "stage timeout must be at least 1 second".to_string(),
            });
        }

        for (field, key) in [
            ("services.sarvam.api_key", &self.services.sarvam.api_key),
            ("services.mistral.api_key", &self.services.mistral.api_key),
            ("services.gemini.api_key", &self.services.gemini.api_key),
        ] {
            if key.is_empty() {
                tracing::warn!("{} is empty; calls to that provider will be rejected", field);
            }
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum concurrent sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle session expiry in seconds
    #[serde(default = "default_session_timeout")]
    pub session_timeout_seconds: u64,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
            max_sessions: default_max_sessions(),
            session_timeout_seconds: default_session_timeout(),
            log_json: false,
        }
    }
}

/// Hosted provider settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicesSettings {
    /// Sarvam (speech-to-text, translation, text-to-speech)
    #[serde(default)]
    pub sarvam: SarvamSettings,

    /// Mistral (intent classification)
    #[serde(default)]
    pub mistral: MistralSettings,

    /// Gemini (response generation)
    #[serde(default)]
    pub gemini: GeminiSettings,
}

/// Sarvam API settings
///
/// One subscription key covers the speech-to-text-translate, translate,
/// and text-to-speech endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarvamSettings {
    #[serde(default = "default_sarvam_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    /// Speech-to-text model
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Translation model
    #[serde(default = "default_translate_model")]
    pub translate_model: String,

    /// Synthesis sample rate in Hz
    #[serde(default = "default_tts_sample_rate")]
    pub tts_sample_rate: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SarvamSettings {
    fn default() -> Self {
        Self {
            endpoint: default_sarvam_endpoint(),
            api_key: String::new(),
            stt_model: default_stt_model(),
            translate_model: default_translate_model(),
            tts_sample_rate: default_tts_sample_rate(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

/// Mistral API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MistralSettings {
    #[serde(default = "default_mistral_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_mistral_model")]
    pub model: String,

    /// Sampling temperature; kept low so label output is deterministic
    #[serde(default = "default_classifier_temperature")]
    pub temperature: f32,

    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MistralSettings {
    fn default() -> Self {
        Self {
            endpoint: default_mistral_endpoint(),
            api_key: String::new(),
            model: default_mistral_model(),
            temperature: default_classifier_temperature(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

/// Gemini API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_gemini_endpoint(),
            api_key: String::new(),
            model: default_gemini_model(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

/// Turn orchestration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Maximum turns retained as generation context
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Skip the conversational branch for loan-application intent.
    /// Set false to run the full branch for every intent.
    #[serde(default = "default_true")]
    pub short_circuit_loan_form: bool,

    /// System instruction for the response generator
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,

    /// Source language for translation (generated replies are in this
    /// language before translation)
    #[serde(default)]
    pub source_language: Language,

    /// Per-stage remote call timeout in seconds; expiry fails the stage
    #[serde(default = "default_stage_timeout")]
    pub stage_timeout_seconds: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            short_circuit_loan_form: true,
            system_instruction: default_system_instruction(),
            source_language: Language::English,
            stage_timeout_seconds: default_stage_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_max_sessions() -> usize {
    256
}

fn default_session_timeout() -> u64 {
    3600
}

fn default_sarvam_endpoint() -> String {
    "https://api.sarvam.ai".to_string()
}

fn default_stt_model() -> String {
    "saaras:v2".to_string()
}

fn default_translate_model() -> String {
    "mayura:v1".to_string()
}

fn default_tts_sample_rate() -> u32 {
    24000
}

fn default_mistral_endpoint() -> String {
    "https://api.mistral.ai".to_string()
}

fn default_mistral_model() -> String {
    "mistral-small-latest".to_string()
}

fn default_classifier_temperature() -> f32 {
    0.1
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_history_capacity() -> usize {
    10
}

fn default_stage_timeout() -> u64 {
    30
}

fn default_system_instruction() -> String {
    "You are a multilingual loan advisor. Answer questions about loans, \
     eligibility, and personal finance clearly and briefly. Keep replies \
     short enough to be spoken aloud."
        .to_string()
}

/// Load settings from an optional file plus environment overrides
///
/// Environment variables use the LOAN_ADVISOR_ prefix with `__` as the
/// section separator, e.g. `LOAN_ADVISOR_SERVICES__SARVAM__API_KEY`.
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        if !Path::new(path).exists() {
            return Err(ConfigError::FileNotFound(path.to_string()));
        }
        builder = builder.add_source(File::with_name(path));
    }

    builder = builder.add_source(
        Environment::with_prefix("LOAN_ADVISOR")
            .separator("__")
            .try_parsing(true),
    );

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.agent.history_capacity, 10);
        assert!(settings.agent.short_circuit_loan_form);
        assert_eq!(settings.services.sarvam.stt_model, "saaras:v2");
        assert_eq!(settings.services.mistral.model, "mistral-small-latest");
        assert_eq!(settings.server.port, 8080);
        settings.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut settings = Settings::default();
        settings.agent.history_capacity = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut settings = Settings::default();
        settings.agent.stage_timeout_seconds = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = load_settings(Some("/nonexistent/loan-advisor.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
