//! Sarvam speech-to-text-translate client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use loan_advisor_core::{AudioClip, Language, ServiceError, Transcriber, Transcription};

const SERVICE: &str = "sarvam-stt";

/// Placeholder returned when the provider answers 2xx with an empty
/// transcript. The turn continues into classification with this text
/// instead of failing.
pub const EMPTY_TRANSCRIPT_PLACEHOLDER: &str = "No transcript available";

/// Speech-to-text configuration
#[derive(Debug, Clone)]
pub struct SarvamSttConfig {
    /// API endpoint base
    pub endpoint: String,
    /// Subscription key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SarvamSttConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.sarvam.ai".to_string(),
            api_key: String::new(),
            model: "saaras:v2".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Sarvam speech-to-text-translate backend
///
/// Sends the recorded clip as multipart form data; the provider detects
/// the spoken language and returns the transcript already translated to
/// the working language.
#[derive(Clone)]
pub struct SarvamStt {
    client: Client,
    config: SarvamSttConfig,
}

impl SarvamStt {
    pub fn new(config: SarvamSttConfig) -> Result<Self, ServiceError> {
        let client = crate::http::build_client(SERVICE, config.timeout)?;
        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!("{}/speech-to-text-translate", self.config.endpoint)
    }

    fn build_form(&self, audio: &AudioClip) -> Result<Form, ServiceError> {
        let file = Part::bytes(audio.bytes.clone())
            .file_name("audio.wav")
            .mime_str(&audio.content_type)
            .map_err(|e| ServiceError::malformed(SERVICE, format!("bad content type: {}", e)))?;

        Ok(Form::new()
            .text("model", self.config.model.clone())
            .text("language_code", "unknown")
            .text("with_timestamps", "false")
            .text("with_diarization", "false")
            .text("num_speakers", "1")
            .part("file", file))
    }
}

#[async_trait]
impl Transcriber for SarvamStt {
    async fn transcribe(&self, audio: &AudioClip) -> Result<Transcription, ServiceError> {
        let form = self.build_form(audio)?;

        let response = self
            .client
            .post(self.api_url())
            .header("api-subscription-key", &self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| crate::http::transport_error(SERVICE, e))?;

        let response = crate::http::check_status(SERVICE, response).await?;

        let body: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::malformed(SERVICE, e.to_string()))?;

        let text = match body.transcript {
            Some(t) if !t.trim().is_empty() => t,
            _ => {
                tracing::warn!("transcription returned no text, using placeholder");
                EMPTY_TRANSCRIPT_PLACEHOLDER.to_string()
            }
        };

        let language = Language::from_code(body.language_code.as_deref().unwrap_or("unknown"));

        tracing::debug!(
            language = %language,
            chars = text.len(),
            "transcription complete"
        );

        Ok(Transcription { text, language })
    }

    fn service_name(&self) -> &'static str {
        SERVICE
    }
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    language_code: Option<String>,
}
