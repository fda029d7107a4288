//! Intent labels
//!
//! Closed-world classification of a transcript's purpose. Every
//! utterance maps to exactly one label; `GeneralQuery` is the default
//! when nothing more specific applies, so there is no "unknown".

use serde::{Deserialize, Serialize};

/// Closed set of intent labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IntentLabel {
    /// User wants to start a loan application
    #[serde(rename = "loanApplication")]
    LoanApplication,
    /// User is asking whether they qualify for a loan
    #[serde(rename = "loanEligibility")]
    LoanEligibility,
    /// User wants financial advice
    #[serde(rename = "financialGuidance")]
    FinancialGuidance,
    /// Anything else
    #[default]
    #[serde(rename = "generalQuery")]
    GeneralQuery,
}

impl IntentLabel {
    /// Wire name as sent to and received from the classifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoanApplication => "loanApplication",
            Self::LoanEligibility => "loanEligibility",
            Self::FinancialGuidance => "financialGuidance",
            Self::GeneralQuery => "generalQuery",
        }
    }

    /// Parse a classifier output into a label
    ///
    /// Trims and case-normalizes before matching. Returns `None` for
    /// anything outside the closed set so the caller can run its
    /// fallback chain; this function never guesses.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "loanapplication" => Some(Self::LoanApplication),
            "loaneligibility" => Some(Self::LoanEligibility),
            "financialguidance" => Some(Self::FinancialGuidance),
            "generalquery" => Some(Self::GeneralQuery),
            _ => None,
        }
    }

    /// All labels, for prompt construction
    pub fn all() -> &'static [IntentLabel] {
        &[
            Self::LoanApplication,
            Self::LoanEligibility,
            Self::FinancialGuidance,
            Self::GeneralQuery,
        ]
    }
}

impl std::fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact() {
        assert_eq!(
            IntentLabel::parse("loanApplication"),
            Some(IntentLabel::LoanApplication)
        );
        assert_eq!(
            IntentLabel::parse("generalQuery"),
            Some(IntentLabel::GeneralQuery)
        );
    }

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(
            IntentLabel::parse("  LOANELIGIBILITY \n"),
            Some(IntentLabel::LoanEligibility)
        );
        assert_eq!(
            IntentLabel::parse("FinancialGuidance"),
            Some(IntentLabel::FinancialGuidance)
        );
    }

    #[test]
    fn test_parse_rejects_off_set() {
        assert_eq!(IntentLabel::parse("loan"), None);
        assert_eq!(IntentLabel::parse(""), None);
        assert_eq!(IntentLabel::parse("I think it is loanApplication."), None);
    }

    #[test]
    fn test_wire_round_trip() {
        for label in IntentLabel::all() {
            let json = serde_json::to_string(label).unwrap();
            let back: IntentLabel = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *label);
        }
    }
}
