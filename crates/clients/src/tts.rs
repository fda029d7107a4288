//! Sarvam text-to-speech client

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use loan_advisor_core::{AudioClip, Language, ServiceError, SpeechSynthesizer};

const SERVICE: &str = "sarvam-tts";

/// Synthesis configuration
#[derive(Debug, Clone)]
pub struct SarvamTtsConfig {
    /// API endpoint base
    pub endpoint: String,
    /// Subscription key
    pub api_key: String,
    /// Requested audio container
    pub audio_format: String,
    /// Requested sample rate in Hz
    pub sample_rate: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SarvamTtsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.sarvam.ai".to_string(),
            api_key: String::new(),
            audio_format: "wav".to_string(),
            sample_rate: 24000,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Sarvam text-to-speech backend
///
/// The provider returns one base64-encoded segment per input text; the
/// first segment is decoded into a playable clip.
#[derive(Clone)]
pub struct SarvamTts {
    client: Client,
    config: SarvamTtsConfig,
}

impl SarvamTts {
    pub fn new(config: SarvamTtsConfig) -> Result<Self, ServiceError> {
        let client = crate::http::build_client(SERVICE, config.timeout)?;
        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!("{}/text-to-speech", self.config.endpoint)
    }

    fn content_type(format: &str) -> &'static str {
        match format {
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            _ => "audio/mpeg",
        }
    }

    /// Decode the first audio segment into a playable clip
    fn clip_from_response(&self, body: TtsResponse) -> Result<AudioClip, ServiceError> {
        let encoded = body
            .audios
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::malformed(SERVICE, "no audio segments in response"))?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| ServiceError::malformed(SERVICE, format!("base64 decode: {}", e)))?;

        let format = body
            .audio_format
            .unwrap_or_else(|| self.config.audio_format.clone());

        Ok(AudioClip::new(bytes, Self::content_type(&format)))
    }
}

#[async_trait]
impl SpeechSynthesizer for SarvamTts {
    async fn synthesize(&self, text: &str, language: Language) -> Result<AudioClip, ServiceError> {
        let request = TtsRequest {
            inputs: vec![text.to_string()],
            target_language_code: language.code(),
            audio_format: self.config.audio_format.clone(),
            sample_rate: self.config.sample_rate,
        };

        let response = self
            .client
            .post(self.api_url())
            .header("api-subscription-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| crate::http::transport_error(SERVICE, e))?;

        let response = crate::http::check_status(SERVICE, response).await?;

        let body: TtsResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::malformed(SERVICE, e.to_string()))?;

        let clip = self.clip_from_response(body)?;

        tracing::debug!(language = %language, bytes = clip.len(), "synthesis complete");

        Ok(clip)
    }

    fn service_name(&self) -> &'static str {
        SERVICE
    }
}

// Sarvam text-to-speech API types
#[derive(Debug, Serialize)]
struct TtsRequest {
    inputs: Vec<String>,
    target_language_code: &'static str,
    audio_format: String,
    sample_rate: u32,
}

#[derive(Debug, Deserialize)]
struct TtsResponse {
    #[serde(default)]
    audios: Vec<String>,
    #[serde(default)]
    audio_format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_advisor_core::ServiceErrorKind;

    #[test]
    fn test_config_default() {
        let config = SarvamTtsConfig::default();
        assert_eq!(config.audio_format, "wav");
        assert_eq!(config.sample_rate, 24000);
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(SarvamTts::content_type("wav"), "audio/wav");
        assert_eq!(SarvamTts::content_type("mp3"), "audio/mpeg");
        assert_eq!(SarvamTts::content_type("ogg"), "audio/mpeg");
    }

    #[test]
    fn test_response_parsing() {
        let body: TtsResponse =
            serde_json::from_str(r#"{"audios": ["AAECAw=="], "request_id": "x"}"#).unwrap();
        assert_eq!(body.audios.len(), 1);
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(body.audios[0].as_bytes())
            .unwrap();
        assert_eq!(bytes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_audios_parse() {
        let body: TtsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.audios.is_empty());
    }

    #[test]
    fn test_decode_first_segment() {
        let tts = SarvamTts::new(SarvamTtsConfig::default()).unwrap();
        let body = TtsResponse {
            audios: vec!["AAECAw==".to_string(), "BAUG".to_string()],
            audio_format: None,
        };
        let clip = tts.clip_from_response(body).unwrap();
        assert_eq!(clip.bytes, vec![0, 1, 2, 3]);
        assert_eq!(clip.content_type, "audio/wav");
    }

    #[test]
    fn test_no_segments_is_malformed() {
        let tts = SarvamTts::new(SarvamTtsConfig::default()).unwrap();
        let body = TtsResponse {
            audios: Vec::new(),
            audio_format: None,
        };
        let err = tts.clip_from_response(body).unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::MalformedPayload);
    }

    #[test]
    fn test_invalid_base64_is_malformed() {
        let tts = SarvamTts::new(SarvamTtsConfig::default()).unwrap();
        let body = TtsResponse {
            audios: vec!["not base64!!".to_string()],
            audio_format: None,
        };
        let err = tts.clip_from_response(body).unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::MalformedPayload);
        assert!(err.message.contains("base64"));
    }
}
