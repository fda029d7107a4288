//! Sarvam translation client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use loan_advisor_core::{Language, ServiceError, Translator};

const SERVICE: &str = "sarvam-translate";

/// Translator configuration
#[derive(Debug, Clone)]
pub struct SarvamTranslatorConfig {
    /// API endpoint base
    pub endpoint: String,
    /// Subscription key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Fixed source language (the generator replies in this language)
    pub source_language: Language,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SarvamTranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.sarvam.ai".to_string(),
            api_key: String::new(),
            model: "mayura:v1".to_string(),
            source_language: Language::English,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Sarvam translate backend
///
/// No pass-through on failure: a provider error fails the branch rather
/// than silently returning the untranslated text.
#[derive(Clone)]
pub struct SarvamTranslator {
    client: Client,
    config: SarvamTranslatorConfig,
}

impl SarvamTranslator {
    pub fn new(config: SarvamTranslatorConfig) -> Result<Self, ServiceError> {
        let client = crate::http::build_client(SERVICE, config.timeout)?;
        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!("{}/translate", self.config.endpoint)
    }
}

#[async_trait]
impl Translator for SarvamTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, ServiceError> {
        let request = TranslateRequest {
            input: text.to_string(),
            source_language_code: self.config.source_language.code(),
            target_language_code: target.code(),
            speaker_gender: "Male",
            mode: "formal",
            model: self.config.model.clone(),
            enable_preprocessing: false,
            output_script: "fully-native",
            numerals_format: "international",
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

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::malformed(SERVICE, e.to_string()))?;

        tracing::debug!(target = %target, chars = body.translated_text.len(), "translation complete");

        Ok(body.translated_text)
    }

    fn service_name(&self) -> &'static str {
        SERVICE
    }
}

// Sarvam translate API types
#[derive(Debug, Serialize)]
struct TranslateRequest {
    input: String,
    source_language_code: &'static str,
    target_language_code: &'static str,
    speaker_gender: &'static str,
    mode: &'static str,
    model: String,
    enable_preprocessing: bool,
    output_script: &'static str,
    numerals_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SarvamTranslatorConfig::default();
        assert_eq!(config.model, "mayura:v1");
        assert_eq!(config.source_language, Language::English);
    }

    #[test]
    fn test_request_serialization() {
        let request = TranslateRequest {
            input: "hello".to_string(),
            source_language_code: "en-IN",
            target_language_code: "hi-IN",
            speaker_gender: "Male",
            mode: "formal",
            model: "mayura:v1".to_string(),
            enable_preprocessing: false,
            output_script: "fully-native",
            numerals_format: "international",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["source_language_code"], "en-IN");
        assert_eq!(json["target_language_code"], "hi-IN");
        assert_eq!(json["mode"], "formal");
    }

    #[test]
    fn test_response_missing_field_is_error() {
        let parsed: Result<TranslateResponse, _> = serde_json::from_str(r#"{"other": 1}"#);
        assert!(parsed.is_err());
    }
}
