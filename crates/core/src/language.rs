//! Language definitions with provider language codes
//!
//! The hosted speech and translation providers identify languages with
//! regional BCP-47 codes (`en-IN`, `hi-IN`, ...). Transcription reports
//! the spoken language; the same code is passed through translation and
//! synthesis so the reply is voiced in the user's language.

use serde::{Deserialize, Serialize};

/// Languages supported end-to-end by the provider stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Bengali,
    Gujarati,
    Kannada,
    Malayalam,
    Marathi,
    Odia,
    Punjabi,
    Tamil,
    Telugu,
}

impl Language {
    /// Get the provider language code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en-IN",
            Self::Hindi => "hi-IN",
            Self::Bengali => "bn-IN",
            Self::Gujarati => "gu-IN",
            Self::Kannada => "kn-IN",
            Self::Malayalam => "ml-IN",
            Self::Marathi => "mr-IN",
            Self::Odia => "od-IN",
            Self::Punjabi => "pa-IN",
            Self::Tamil => "ta-IN",
            Self::Telugu => "te-IN",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Bengali => "Bengali",
            Self::Gujarati => "Gujarati",
            Self::Kannada => "Kannada",
            Self::Malayalam => "Malayalam",
            Self::Marathi => "Marathi",
            Self::Odia => "Odia",
            Self::Punjabi => "Punjabi",
            Self::Tamil => "Tamil",
            Self::Telugu => "Telugu",
        }
    }

    /// Parse a provider language code
    ///
    /// Transcription may report `unknown` for short or noisy clips; that
    /// and any unrecognised code fall back to English, matching the
    /// `en-IN` default applied at the capture boundary.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "hi-IN" => Self::Hindi,
            "bn-IN" => Self::Bengali,
            "gu-IN" => Self::Gujarati,
            "kn-IN" => Self::Kannada,
            "ml-IN" => Self::Malayalam,
            "mr-IN" => Self::Marathi,
            "od-IN" => Self::Odia,
            "pa-IN" => Self::Punjabi,
            "ta-IN" => Self::Tamil,
            "te-IN" => Self::Telugu,
            _ => Self::English,
        }
    }

    /// All supported languages
    pub fn all() -> &'static [Language] {
        &[
            Self::English,
            Self::Hindi,
            Self::Bengali,
            Self::Gujarati,
            Self::Kannada,
            Self::Malayalam,
            Self::Marathi,
            Self::Odia,
            Self::Punjabi,
            Self::Tamil,
            Self::Telugu,
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for lang in Language::all() {
            assert_eq!(Language::from_code(lang.code()), *lang);
        }
    }

    #[test]
    fn test_unknown_code_defaults_to_english() {
        assert_eq!(Language::from_code("unknown"), Language::English);
        assert_eq!(Language::from_code(""), Language::English);
        assert_eq!(Language::from_code("fr-FR"), Language::English);
    }

    #[test]
    fn test_code_trims_whitespace() {
        assert_eq!(Language::from_code(" hi-IN "), Language::Hindi);
    }
}
