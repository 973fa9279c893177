//! Lending policy.
//!
//! Two layers:
//! 1. **Engine constants** -- the flat monthly rate and the per-category
//!    loan-to-value ratios. These feed the pure pricing functions and are
//!    never runtime parameters.
//! 2. **Origination policy** -- caller-side bounds (amount, term, minimum
//!    appraisal) enforced by the quote and wizard layers, loadable from a
//!    config file.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanDeskError;
use crate::types::{Money, Rate};
use crate::LoanDeskResult;

/// Flat interest charged per month on the full principal.
pub const MONTHLY_INTEREST_RATE: Rate = dec!(0.20);

/// The monthly rate as a whole percentage, as recorded on submissions.
pub const MONTHLY_INTEREST_RATE_PCT: u32 = 20;

/// Loan-to-value ratio for vehicles (cars, motorcycles, trucks).
pub const VEHICLE_LTV: Rate = dec!(0.50);

/// Loan-to-value ratio for equipment (machinery, tools, appliances).
pub const EQUIPMENT_LTV: Rate = dec!(0.30);

/// Loan-to-value ratio for land (property, plots, real estate).
pub const LAND_LTV: Rate = dec!(0.60);

/// Caller-side origination bounds. None of these reach the pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginationPolicy {
    pub min_amount: Money,
    /// Ceiling for unsecured loans; secured loans are bounded by LTV instead.
    pub max_unsecured_amount: Money,
    pub min_term: u32,
    pub max_term: u32,
    /// Smallest collateral appraisal accepted for a secured loan.
    pub min_asset_value: Money,
    pub default_amount: Money,
    pub default_term: u32,
}

impl Default for OriginationPolicy {
    fn default() -> Self {
        Self {
            min_amount: dec!(1_000),
            max_unsecured_amount: dec!(500_000),
            min_term: 1,
            max_term: 12,
            min_asset_value: dec!(10_000),
            default_amount: dec!(10_000),
            default_term: 3,
        }
    }
}

impl OriginationPolicy {
    /// Reject bounds that cannot describe any loan.
    pub fn validate(&self) -> LoanDeskResult<()> {
        if self.min_amount <= Decimal::ZERO {
            return Err(LoanDeskError::InvalidInput {
                field: "min_amount".into(),
                reason: "Minimum amount must be positive.".into(),
            });
        }
        if self.max_unsecured_amount < self.min_amount {
            return Err(LoanDeskError::InvalidInput {
                field: "max_unsecured_amount".into(),
                reason: "Maximum unsecured amount cannot be below the minimum amount.".into(),
            });
        }
        if self.min_term == 0 || self.max_term < self.min_term {
            return Err(LoanDeskError::InvalidInput {
                field: "max_term".into(),
                reason: format!(
                    "Term bounds must satisfy 1 <= min_term <= max_term (got {}..={}).",
                    self.min_term, self.max_term
                ),
            });
        }
        if self.min_asset_value < Decimal::ZERO {
            return Err(LoanDeskError::InvalidInput {
                field: "min_asset_value".into(),
                reason: "Minimum asset value cannot be negative.".into(),
            });
        }
        if !self.amount_in_bounds(self.default_amount, self.max_unsecured_amount) {
            return Err(LoanDeskError::InvalidInput {
                field: "default_amount".into(),
                reason: "Default amount must lie within the unsecured amount bounds.".into(),
            });
        }
        if !self.term_in_bounds(self.default_term) {
            return Err(LoanDeskError::InvalidInput {
                field: "default_term".into(),
                reason: "Default term must lie within the term bounds.".into(),
            });
        }
        Ok(())
    }

    pub fn amount_in_bounds(&self, amount: Money, max_principal: Money) -> bool {
        amount >= self.min_amount && amount <= max_principal
    }

    pub fn term_in_bounds(&self, term_months: u32) -> bool {
        term_months >= self.min_term && term_months <= self.max_term
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(OriginationPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_ltv_ratios_below_one() {
        for ratio in [VEHICLE_LTV, EQUIPMENT_LTV, LAND_LTV] {
            assert!(ratio > Decimal::ZERO && ratio < Decimal::ONE);
        }
    }

    #[test]
    fn test_rate_percentage_matches_rate() {
        assert_eq!(
            Decimal::from(MONTHLY_INTEREST_RATE_PCT) / dec!(100),
            MONTHLY_INTEREST_RATE
        );
    }

    #[test]
    fn test_inverted_term_bounds_rejected() {
        let policy = OriginationPolicy {
            min_term: 6,
            max_term: 3,
            ..OriginationPolicy::default()
        };
        match policy.validate().unwrap_err() {
            LoanDeskError::InvalidInput { field, .. } => assert_eq!(field, "max_term"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let policy: OriginationPolicy =
            serde_json::from_str(r#"{ "max_term": 6, "default_term": 2 }"#).unwrap();
        assert_eq!(policy.max_term, 6);
        assert_eq!(policy.min_amount, dec!(1_000));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_bounds_helpers() {
        let policy = OriginationPolicy::default();
        assert!(policy.amount_in_bounds(dec!(1_000), dec!(500_000)));
        assert!(!policy.amount_in_bounds(dec!(999), dec!(500_000)));
        assert!(!policy.amount_in_bounds(dec!(250_001), dec!(250_000)));
        assert!(policy.term_in_bounds(12));
        assert!(!policy.term_in_bounds(13));
        assert!(!policy.term_in_bounds(0));
    }
}
