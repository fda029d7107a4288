//! Mistral intent classification client
//!
//! Asks a chat model to map a transcript onto the closed label set.
//! The model's raw answer goes back to the agent crate, which owns the
//! exact-match check and the keyword fallback; this client only does
//! the network call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use loan_advisor_core::{IntentLabel, IntentModel, ServiceError};

const SERVICE: &str = "mistral-intent";

const SYSTEM_PROMPT: &str = r#"You are an AI designed to classify text into predefined categories.

**Categories:**
- loanApplication -> If the user is asking about applying for a loan.
- loanEligibility -> If the user is inquiring about whether they qualify for a loan.
- financialGuidance -> If the user seeks financial advice (e.g., managing expenses, investments).
- generalQuery -> If the query does not match the above.

**Instructions:**
- Analyze the input and map it to one of the categories.
- Only return the exact category name.
- If unsure, return "generalQuery"."#;

/// Classifier configuration
#[derive(Debug, Clone)]
pub struct MistralConfig {
    /// API endpoint base
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Sampling temperature; low keeps label output deterministic
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.mistral.ai".to_string(),
            api_key: String::new(),
            model: "mistral-small-latest".to_string(),
            temperature: 0.1,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Mistral chat-completions backend for intent classification
#[derive(Clone)]
pub struct MistralClassifier {
    client: Client,
    config: MistralConfig,
}

impl MistralClassifier {
    pub fn new(config: MistralConfig) -> Result<Self, ServiceError> {
        let client = crate::http::build_client(SERVICE, config.timeout)?;
        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.endpoint)
    }

    fn user_prompt(transcript: &str) -> String {
        let labels: Vec<&str> = IntentLabel::all().iter().map(|l| l.as_str()).collect();
        format!(
            "Classify the following statement: \"{}\".\n\
             Respond with only one of the following categories: {}",
            transcript,
            labels.join(", ")
        )
    }
}

#[async_trait]
impl IntentModel for MistralClassifier {
    async fn classify(&self, transcript: &str) -> Result<String, ServiceError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::user_prompt(transcript),
                },
            ],
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| crate::http::transport_error(SERVICE, e))?;

        let response = crate::http::check_status(SERVICE, response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::malformed(SERVICE, e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ServiceError::malformed(SERVICE, "response has no choices"))?;

        tracing::debug!(label = %content.trim(), "classifier answered");

        Ok(content)
    }

    fn service_name(&self) -> &'static str {
        SERVICE
    }
}

// Mistral API types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = MistralConfig::default();
        assert_eq!(config.model, "mistral-small-latest");
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_user_prompt_lists_all_labels() {
        let prompt = MistralClassifier::user_prompt("am I eligible");
        for label in IntentLabel::all() {
            assert!(prompt.contains(label.as_str()));
        }
        assert!(prompt.contains("am I eligible"));
    }

    #[test]
    fn test_response_parsing() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "loanApplication"}}]}"#,
        )
        .unwrap();
        assert_eq!(body.choices[0].message.content, "loanApplication");
    }

    #[test]
    fn test_empty_choices_parse() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(body.choices.is_empty());
    }
}
