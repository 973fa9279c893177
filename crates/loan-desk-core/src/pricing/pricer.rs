//! Flat-rate loan pricing with the duplum cap.
//!
//! Interest is charged once on the full principal for the full term
//! (`principal x rate x months`), then capped so that total interest never
//! exceeds the principal. Both the uncapped and capped figures are returned
//! for disclosure.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanDeskError;
use crate::policy::MONTHLY_INTEREST_RATE;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::LoanDeskResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// String-typed entry point for callers that receive the term as a number
/// from JSON or a command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPricingInput {
    pub principal: Money,
    pub term_months: Decimal,
}

/// Repayment terms for one (principal, term) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub monthly_rate: Rate,
    pub term_months: u32,
    /// `principal x monthly_rate x term_months`, before the cap.
    pub raw_interest: Money,
    /// `min(raw_interest, principal)`.
    pub capped_interest: Money,
    /// True only when the exact interest exceeds the principal
    /// (`monthly_rate x term_months > 1`); equality is not capped.
    pub interest_cap_applied: bool,
    pub total_repayment: Money,
    pub monthly_installment: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price a loan at the flat monthly rate, applying the duplum cap.
///
/// Pure: no logging, no clock, no shared state. The term is not range-checked
/// beyond being positive; bounds such as 1..=12 months belong to the caller.
pub fn price(principal: Money, term_months: u32) -> LoanDeskResult<LoanTerms> {
    if principal <= Decimal::ZERO {
        return Err(LoanDeskError::InvalidAmount {
            field: "principal".into(),
            reason: format!("Principal must be positive (got {principal})."),
        });
    }
    if term_months == 0 {
        return Err(LoanDeskError::InvalidTerm(
            "Term must be at least one month (got 0).".into(),
        ));
    }

    let months = Decimal::from(term_months);
    let raw_interest = principal
        .checked_mul(MONTHLY_INTEREST_RATE)
        .and_then(|per_month| per_month.checked_mul(months))
        .ok_or_else(|| unrepresentable("principal", principal))?;

    // rate x months is exact for any u32 term, while raw_interest rounds once
    // the product needs more than 28 decimal places. Decide the cap on the
    // former so the boundary does not depend on the principal's scale.
    let interest_cap_applied = MONTHLY_INTEREST_RATE * months > Decimal::ONE;
    let capped_interest = if interest_cap_applied {
        principal
    } else {
        raw_interest.min(principal)
    };

    let total_repayment = principal
        .checked_add(capped_interest)
        .ok_or_else(|| unrepresentable("principal", principal))?;
    let monthly_installment = total_repayment / months;

    Ok(LoanTerms {
        principal,
        monthly_rate: MONTHLY_INTEREST_RATE,
        term_months,
        raw_interest,
        capped_interest,
        interest_cap_applied,
        total_repayment,
        monthly_installment,
    })
}

/// Validate a loosely-typed pricing request and wrap the terms in the
/// standard output envelope.
pub fn price_loan(input: &LoanPricingInput) -> LoanDeskResult<ComputationOutput<LoanTerms>> {
    let term_months = whole_months(input.term_months)?;
    let terms = price(input.principal, term_months)?;

    let mut warnings = Vec::new();
    if terms.interest_cap_applied {
        warnings.push(format!(
            "Duplum rule applied: interest of {} capped at the principal of {}.",
            terms.raw_interest, terms.principal
        ));
    }

    let assumptions = serde_json::json!({
        "monthly_rate": MONTHLY_INTEREST_RATE.to_string(),
        "interest_basis": "flat on full principal",
        "interest_cap": "total interest <= principal",
    });

    Ok(with_metadata(
        "Flat monthly interest with duplum cap",
        &assumptions,
        warnings,
        terms,
    ))
}

/// Convert a numeric term to whole months, rejecting fractional and
/// non-positive values.
pub fn whole_months(term_months: Decimal) -> LoanDeskResult<u32> {
    if term_months <= Decimal::ZERO {
        return Err(LoanDeskError::InvalidTerm(format!(
            "Term must be a positive number of months (got {term_months})."
        )));
    }
    if term_months.fract() != Decimal::ZERO {
        return Err(LoanDeskError::InvalidTerm(format!(
            "Term must be a whole number of months (got {term_months})."
        )));
    }
    term_months.to_u32().ok_or_else(|| {
        LoanDeskError::InvalidTerm(format!("Term of {term_months} months is out of range."))
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn unrepresentable(field: &str, value: Money) -> LoanDeskError {
    LoanDeskError::InvalidAmount {
        field: field.into(),
        reason: format!("{value} is too large to price."),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
