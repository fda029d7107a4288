//! Intent resolution fallback chain
//!
//! Classification never fails a turn. The remote model's answer is
//! checked against the closed label set; anything else falls through an
//! ordered list of strategies, ending in `generalQuery`. Each strategy
//! is pure and independently testable.

use unicode_segmentation::UnicodeSegmentation;

use loan_advisor_core::IntentLabel;

/// One step of the resolution chain
///
/// `model_output` is the classifier's raw answer when the remote call
/// succeeded; `transcript` is what the user said. Returns `None` to
/// pass resolution to the next strategy.
pub trait ClassificationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(&self, model_output: Option<&str>, transcript: &str) -> Option<IntentLabel>;
}

/// Accept the model's answer when it is exactly one of the four labels
/// (after trimming and case normalization)
pub struct ExactLabel;

impl ClassificationStrategy for ExactLabel {
    fn name(&self) -> &'static str {
        "exact_label"
    }

    fn resolve(&self, model_output: Option<&str>, _transcript: &str) -> Option<IntentLabel> {
        model_output.and_then(IntentLabel::parse)
    }
}

/// Keyword scan of the transcript for domain terms
///
/// Stem matching on unicode word boundaries, so "applying" matches
/// "apply" and "eligibility" matches "eligible".
pub struct KeywordHeuristic;

impl KeywordHeuristic {
    fn has_stem(words: &[String], stem: &str) -> bool {
        words.iter().any(|w| w.starts_with(stem))
    }
}

impl ClassificationStrategy for KeywordHeuristic {
    fn name(&self) -> &'static str {
        "keyword_heuristic"
    }

    fn resolve(&self, _model_output: Option<&str>, transcript: &str) -> Option<IntentLabel> {
        let words: Vec<String> = transcript
            .unicode_words()
            .map(|w| w.to_lowercase())
            .collect();

        let has_loan = Self::has_stem(&words, "loan");

        if has_loan && Self::has_stem(&words, "apply") {
            return Some(IntentLabel::LoanApplication);
        }
        if has_loan && Self::has_stem(&words, "eligib") {
            return Some(IntentLabel::LoanEligibility);
        }
        if Self::has_stem(&words, "financ")
            || Self::has_stem(&words, "money")
            || Self::has_stem(&words, "invest")
        {
            return Some(IntentLabel::FinancialGuidance);
        }

        None
    }
}

/// Terminal strategy: everything else is a general query
pub struct DefaultLabel;

impl ClassificationStrategy for DefaultLabel {
    fn name(&self) -> &'static str {
        "default"
    }

    fn resolve(&self, _model_output: Option<&str>, _transcript: &str) -> Option<IntentLabel> {
        Some(IntentLabel::GeneralQuery)
    }
}

/// Ordered strategy chain
///
/// The default chain is exact match, keyword heuristic, general-query
/// default; the last strategy always answers, so resolution is total.
pub struct IntentResolver {
    strategies: Vec<Box<dyn ClassificationStrategy>>,
}

impl IntentResolver {
    pub fn new(strategies: Vec<Box<dyn ClassificationStrategy>>) -> Self {
        Self { strategies }
    }

    /// Resolve a label from the model output and transcript
    pub fn resolve(&self, model_output: Option<&str>, transcript: &str) -> IntentLabel {
        for strategy in &self.strategies {
            if let Some(label) = strategy.resolve(model_output, transcript) {
                tracing::debug!(strategy = strategy.name(), label = %label, "intent resolved");
                return label;
            }
        }
        // Unreachable with the default chain; kept total regardless.
        IntentLabel::GeneralQuery
    }
}

impl Default for IntentResolver {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ExactLabel),
            Box::new(KeywordHeuristic),
            Box::new(DefaultLabel),
        ])
    }
}
