//! Service traits for the hosted providers
//!
//! Each trait wraps exactly one remote endpoint. Implementations live
//! in `loan-advisor-clients`; the orchestrator only sees these seams,
//! which is what makes each pipeline transition testable without a
//! live network.

use async_trait::async_trait;

use crate::language::Language;
use crate::pipeline::{AudioClip, Transcription};
use crate::Result;

/// Speech-to-text interface
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn Transcriber> = Arc::new(SarvamStt::new(config)?);
/// let transcription = stt.transcribe(&clip).await?;
/// println!("heard ({}): {}", transcription.language, transcription.text);
/// ```
#[async_trait]
pub trait Transcriber: Send + Sync + 'static {
    /// Transcribe one recorded utterance
    ///
    /// Returns the transcript and the detected spoken language. An
    /// empty transcript after a successful call is resolved to a
    /// placeholder by the implementation, not reported as an error.
    async fn transcribe(&self, audio: &AudioClip) -> Result<Transcription>;

    /// Provider name for logging
    fn service_name(&self) -> &'static str;
}

/// Intent classification model interface
///
/// Returns the model's raw label text. Normalization against the
/// closed label set and the keyword fallback live in the agent crate,
/// so a misbehaving model never fails a turn.
#[async_trait]
pub trait IntentModel: Send + Sync + 'static {
    /// Ask the model to classify a transcript
    async fn classify(&self, transcript: &str) -> Result<String>;

    /// Provider name for logging
    fn service_name(&self) -> &'static str;
}

/// Generative response interface
#[async_trait]
pub trait ResponseGenerator: Send + Sync + 'static {
    /// Generate a reply from the rendered conversation context
    ///
    /// `context` is the newline-joined `User:`/`AI:` history, oldest
    /// first. An empty completion is an error: the branch fails rather
    /// than voicing nothing.
    async fn generate(&self, context: &str) -> Result<String>;

    /// Provider name for logging
    fn service_name(&self) -> &'static str;
}

/// Translation interface
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Translate generated text into the user's language
    ///
    /// The source language is fixed by configuration. There is no
    /// silent pass-through: a provider error fails the branch instead
    /// of returning the untranslated input.
    async fn translate(&self, text: &str, target: Language) -> Result<String>;

    /// Provider name for logging
    fn service_name(&self) -> &'static str;
}

/// Text-to-speech interface
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Synthesize the reply into a playable clip
    async fn synthesize(&self, text: &str, language: Language) -> Result<AudioClip>;

    /// Provider name for logging
    fn service_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTranscriber;

    #[async_trait]
    impl Transcriber for MockTranscriber {
        async fn transcribe(&self, _audio: &AudioClip) -> Result<Transcription> {
            Ok(Transcription {
                text: "test transcript".to_string(),
                language: Language::Hindi,
            })
        }

        fn service_name(&self) -> &'static str {
            "mock-stt"
        }
    }

    #[tokio::test]
    async fn test_mock_transcriber() {
        let stt = MockTranscriber;
        let clip = AudioClip::wav(vec![0u8; 16]);
        let result = stt.transcribe(&clip).await.unwrap();
        assert_eq!(result.text, "test transcript");
        assert_eq!(result.language, Language::Hindi);
        assert_eq!(stt.service_name(), "mock-stt");
    }
}
