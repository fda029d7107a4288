//! Gemini response generation client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use loan_advisor_core::{ResponseGenerator, ServiceError};

const SERVICE: &str = "gemini-generate";

/// Generator configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API endpoint base
    pub endpoint: String,
    /// API key (passed as query parameter)
    pub api_key: String,
    /// Model name
    pub model: String,
    /// System instruction fixing the advisor persona
    pub system_instruction: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            system_instruction: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Gemini generateContent backend
///
/// The conversation history arrives pre-rendered as one text block
/// (`User:`/`AI:` lines, oldest first); the model continues it.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, ServiceError> {
        let client = crate::http::build_client(SERVICE, config.timeout)?;
        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint, self.config.model
        )
    }
}

#[async_trait]
impl ResponseGenerator for GeminiGenerator {
    async fn generate(&self, context: &str) -> Result<String, ServiceError> {
        let request = GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: self.config.system_instruction.clone(),
                }],
            },
            contents: vec![Content {
                parts: vec![TextPart {
                    text: context.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.api_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| crate::http::transport_error(SERVICE, e))?;

        let response = crate::http::check_status(SERVICE, response).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::malformed(SERVICE, e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        // An empty completion fails the branch; there is nothing to
        // translate or voice.
        if text.trim().is_empty() {
            return Err(ServiceError::malformed(SERVICE, "empty completion"));
        }

        tracing::debug!(chars = text.len(), "generation complete");

        Ok(text)
    }

    fn service_name(&self) -> &'static str {
        SERVICE
    }
}

// Gemini API types
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    #[serde(rename = "system_instruction")]
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_api_url() {
        let generator = GeminiGenerator::new(GeminiConfig::default()).unwrap();
        assert!(generator
            .api_url()
            .ends_with("/v1beta/models/gemini-1.5-flash:generateContent"));
    }

    #[test]
    fn test_response_parsing() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "A loan is..."}], "role": "model"}}]}"#,
        )
        .unwrap();
        assert_eq!(body.candidates[0].content.parts[0].text, "A loan is...");
    }

    #[test]
    fn test_response_parsing_no_candidates() {
        let body: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(body.candidates.is_empty());
    }
}
