//! Loan quotes: caller-side origination policy applied once, on top of the
//! pure engine.
//!
//! Sequencing for secured loans is collateral first (to bound the principal),
//! then pricing. Policy breaches never clamp the request; they are reported
//! in `breaches` and as warnings so the caller decides what to do.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LoanDeskError;
use crate::format::format_kes;
use crate::policy::OriginationPolicy;
use crate::pricing::collateral::{max_loan, CollateralCategory, CollateralLimit};
use crate::pricing::pricer::{price, LoanTerms};
use crate::types::{with_metadata, ComputationOutput, LoanType, Money};
use crate::LoanDeskResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralInput {
    pub category: CollateralCategory,
    pub asset_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub loan_type: LoanType,
    pub principal: Money,
    pub term_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral: Option<CollateralInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub loan_type: LoanType,
    pub terms: LoanTerms,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collateral: Option<CollateralLimit>,
    /// LTV maximum for secured loans, the unsecured ceiling otherwise.
    pub max_principal: Money,
    pub within_limits: bool,
    pub breaches: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The largest principal a borrower may select for this loan type.
pub fn principal_ceiling(
    loan_type: LoanType,
    collateral: Option<&CollateralLimit>,
    policy: &OriginationPolicy,
) -> Money {
    match (loan_type, collateral) {
        (LoanType::Secured, Some(limit)) => limit.max_principal,
        (LoanType::Secured, None) => Decimal::ZERO,
        (LoanType::Unsecured, _) => policy.max_unsecured_amount,
    }
}

/// Size (when secured) and price a loan request, listing every policy breach.
pub fn quote_loan(
    request: &QuoteRequest,
    policy: &OriginationPolicy,
) -> LoanDeskResult<ComputationOutput<LoanQuote>> {
    policy.validate()?;

    let collateral = match (request.loan_type, &request.collateral) {
        (LoanType::Secured, Some(c)) => Some(max_loan(c.category, c.asset_value)?),
        (LoanType::Secured, None) => {
            return Err(LoanDeskError::InvalidInput {
                field: "collateral".into(),
                reason: "Secured loans require a collateral category and asset value.".into(),
            });
        }
        (LoanType::Unsecured, _) => None,
    };

    let terms = price(request.principal, request.term_months)?;
    let max_principal = principal_ceiling(request.loan_type, collateral.as_ref(), policy);

    let mut breaches = Vec::new();
    if let (Some(input), Some(limit)) = (&request.collateral, &collateral) {
        if input.asset_value < policy.min_asset_value {
            breaches.push(format!(
                "Asset value {} is below the minimum appraisal of {}.",
                format_kes(input.asset_value),
                format_kes(policy.min_asset_value)
            ));
        }
        if limit.max_principal < policy.min_amount {
            breaches.push(format!(
                "Collateral supports at most {}, below the minimum loan of {}.",
                format_kes(limit.max_principal),
                format_kes(policy.min_amount)
            ));
        }
    }
    if request.principal < policy.min_amount {
        breaches.push(format!(
            "Principal {} is below the minimum loan of {}.",
            format_kes(request.principal),
            format_kes(policy.min_amount)
        ));
    }
    if request.principal > max_principal {
        breaches.push(format!(
            "Principal {} exceeds the maximum of {} for a {} loan.",
            format_kes(request.principal),
            format_kes(max_principal),
            request.loan_type
        ));
    }
    if !policy.term_in_bounds(request.term_months) {
        breaches.push(format!(
            "Term of {} months is outside {}..={} months.",
            request.term_months, policy.min_term, policy.max_term
        ));
    }

    for breach in &breaches {
        warn!(loan_type = %request.loan_type, "{breach}");
    }
    debug!(
        loan_type = %request.loan_type,
        principal = %request.principal,
        term_months = request.term_months,
        max_principal = %max_principal,
        breaches = breaches.len(),
        "Quoted loan"
    );

    let mut warnings = breaches.clone();
    if terms.interest_cap_applied {
        warnings.push(format!(
            "Duplum rule applied: interest capped at {}.",
            format_kes(terms.capped_interest)
        ));
    }

    let quote = LoanQuote {
        loan_type: request.loan_type,
        within_limits: breaches.is_empty(),
        terms,
        collateral,
        max_principal,
        breaches,
    };

    Ok(with_metadata(
        "Collateral sizing then flat-rate pricing with duplum cap",
        policy,
        warnings,
        quote,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
