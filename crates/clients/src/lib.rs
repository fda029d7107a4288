//! HTTP clients for the hosted providers
//!
//! One thin typed wrapper per remote endpoint:
//! - `SarvamStt` - speech-to-text-translate
//! - `MistralClassifier` - intent classification
//! - `GeminiGenerator` - response generation
//! - `SarvamTranslator` - translation
//! - `SarvamTts` - speech synthesis
//!
//! Every wrapper implements one trait from `loan-advisor-core`, does no
//! caching and no retries, and surfaces failures as `ServiceError`.

pub mod generate;
pub mod intent;
pub mod stt;
pub mod translate;
pub mod tts;

mod http;

pub use generate::{GeminiConfig, GeminiGenerator};
pub use intent::{MistralClassifier, MistralConfig};
pub use stt::{SarvamStt, SarvamSttConfig};
pub use translate::{SarvamTranslator, SarvamTranslatorConfig};
pub use tts::{SarvamTts, SarvamTtsConfig};
