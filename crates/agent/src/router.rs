//! Intent routing
//!
//! Maps a resolved label onto the execution branch for the rest of the
//! turn. A total function: every label routes somewhere.

use loan_advisor_core::{BranchDecision, IntentLabel};

/// Routes a classified intent to an execution branch
///
/// `loanApplication` short-circuits to the loan form when enabled;
/// with the flag off it runs the conversational branch like any other
/// label, so the assistant talks the user through the application
/// instead of handing off to the form.
#[derive(Debug, Clone, Copy)]
pub struct IntentRouter {
    short_circuit_loan_form: bool,
}

impl IntentRouter {
    pub fn new(short_circuit_loan_form: bool) -> Self {
        Self {
            short_circuit_loan_form,
        }
    }

    pub fn route(&self, label: IntentLabel) -> BranchDecision {
        match label {
            IntentLabel::LoanApplication if self.short_circuit_loan_form => {
                BranchDecision::ShortCircuitLoanForm
            }
            _ => BranchDecision::RunConversationalBranch,
        }
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(true)
    }
}
