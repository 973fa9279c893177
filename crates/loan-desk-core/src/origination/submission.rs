//! The application payload posted to the spreadsheet endpoint.
//!
//! Field names are camelCase to match the sheet's script.

use serde::{Deserialize, Serialize};

use crate::error::LoanDeskError;
use crate::policy::{OriginationPolicy, MONTHLY_INTEREST_RATE_PCT};
use crate::pricing::collateral::CollateralCategory;
use crate::types::{LoanType, Money};
use crate::LoanDeskResult;

use super::wizard::{WizardState, WizardStep};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmission {
    pub borrower_id: String,
    pub full_name: String,
    pub email: String,
    pub mpesa_number: String,
    pub is_repeat: bool,
    pub docs_reused: bool,
    pub collateral_changed: bool,
    pub loan_type: LoanType,
    pub loan_amount: Money,
    pub loan_term: u32,
    /// Monthly rate as a whole percentage.
    pub interest_rate: u32,
    pub collateral_type: Option<CollateralCategory>,
    pub collateral_description: String,
    pub asset_value: Money,
    pub monthly_installment: Money,
    pub total_repayment: Money,
    /// File names only; empty when documents on file are reused.
    pub documents: Vec<String>,
}

/// Build the payload for an application sitting at the review step.
pub fn build_submission(
    state: &WizardState,
    policy: &OriginationPolicy,
) -> LoanDeskResult<ApplicationSubmission> {
    if state.step != WizardStep::Review {
        return Err(LoanDeskError::InvalidTransition {
            step: state.step.to_string(),
            event: "build_submission".into(),
        });
    }
    state.validate_for_review(policy)?;

    let terms = state.terms()?;
    let borrower = state.borrower.clone().unwrap_or_default();
    let loan_type = state.loan_type.unwrap_or(LoanType::Unsecured);
    let secured = loan_type == LoanType::Secured;

    let documents = if borrower.docs_reused {
        Vec::new()
    } else {
        state.documents.iter().map(|d| d.file_name.clone()).collect()
    };

    Ok(ApplicationSubmission {
        borrower_id: if borrower.borrower_id.is_empty() {
            state.contact.mpesa_number.clone()
        } else {
            borrower.borrower_id
        },
        full_name: state.contact.full_name.trim().to_string(),
        email: state.contact.email.clone(),
        mpesa_number: state.contact.mpesa_number.clone(),
        is_repeat: borrower.is_repeat,
        docs_reused: borrower.docs_reused,
        collateral_changed: borrower.collateral_changed,
        loan_type,
        loan_amount: state.amount,
        loan_term: state.term_months,
        interest_rate: MONTHLY_INTEREST_RATE_PCT,
        collateral_type: if secured { state.collateral_category } else { None },
        collateral_description: if secured {
            state.collateral_description.clone()
        } else {
            String::new()
        },
        asset_value: if secured { state.asset_value } else { Money::ZERO },
        monthly_installment: terms.monthly_installment,
        total_repayment: terms.total_repayment,
        documents,
    })
}
