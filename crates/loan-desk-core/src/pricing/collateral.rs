//! Loan-to-value collateral sizing for secured loans.
//!
//! The maximum principal is `floor(asset_value x ratio)` where the ratio is a
//! fixed policy constant per collateral category. Flooring never rounds up,
//! so the limit never exceeds the exact LTV product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LoanDeskError;
use crate::policy::{EQUIPMENT_LTV, LAND_LTV, VEHICLE_LTV};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::LoanDeskResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Closed set of pledgeable asset classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollateralCategory {
    Vehicle,
    Equipment,
    Land,
}

impl CollateralCategory {
    pub const ALL: [CollateralCategory; 3] = [
        CollateralCategory::Vehicle,
        CollateralCategory::Equipment,
        CollateralCategory::Land,
    ];

    pub fn ltv_ratio(&self) -> Rate {
        match self {
            CollateralCategory::Vehicle => VEHICLE_LTV,
            CollateralCategory::Equipment => EQUIPMENT_LTV,
            CollateralCategory::Land => LAND_LTV,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollateralCategory::Vehicle => "vehicle",
            CollateralCategory::Equipment => "equipment",
            CollateralCategory::Land => "land",
        }
    }

    /// Examples shown to borrowers when choosing a category.
    pub fn description(&self) -> &'static str {
        match self {
            CollateralCategory::Vehicle => "Cars, motorcycles, trucks",
            CollateralCategory::Equipment => "Machinery, tools, appliances",
            CollateralCategory::Land => "Property, plots, real estate",
        }
    }
}

impl fmt::Display for CollateralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollateralCategory {
    type Err = LoanDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vehicle" => Ok(CollateralCategory::Vehicle),
            "equipment" => Ok(CollateralCategory::Equipment),
            "land" => Ok(CollateralCategory::Land),
            _ => Err(LoanDeskError::UnknownCollateralCategory(s.to_string())),
        }
    }
}

/// String-typed sizing request, as received from JSON or the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralSizingInput {
    pub category: String,
    pub asset_value: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralLimit {
    pub collateral_category: CollateralCategory,
    pub asset_value: Money,
    pub loan_to_value_ratio: Rate,
    pub max_principal: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Maximum principal obtainable against `asset_value` of the given category.
///
/// No minimum appraisal is enforced here; that is origination policy.
pub fn max_loan(category: CollateralCategory, asset_value: Money) -> LoanDeskResult<CollateralLimit> {
    if asset_value <= Decimal::ZERO {
        return Err(LoanDeskError::InvalidAmount {
            field: "asset_value".into(),
            reason: format!("Asset value must be positive (got {asset_value})."),
        });
    }

    let ratio = category.ltv_ratio();
    // ratio < 1, so the product cannot overflow
    let max_principal = (asset_value * ratio).floor();

    Ok(CollateralLimit {
        collateral_category: category,
        asset_value,
        loan_to_value_ratio: ratio,
        max_principal,
    })
}

/// Parse the category, size the collateral and wrap the limit in the
/// standard output envelope.
pub fn size_collateral(
    input: &CollateralSizingInput,
) -> LoanDeskResult<ComputationOutput<CollateralLimit>> {
    let category: CollateralCategory = input.category.parse()?;
    let limit = max_loan(category, input.asset_value)?;

    let assumptions = serde_json::json!({
        "ltv_ratios": CollateralCategory::ALL
            .iter()
            .map(|c| (c.as_str(), c.ltv_ratio().to_string()))
            .collect::<std::collections::BTreeMap<_, _>>(),
        "rounding": "floor to whole currency units",
    });

    Ok(with_metadata(
        "Loan-to-value collateral sizing",
        &assumptions,
        Vec::new(),
        limit,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_vehicle_half_value() {
        let limit = max_loan(CollateralCategory::Vehicle, dec!(500_000)).unwrap();
        assert_eq!(limit.max_principal, dec!(250_000));
        assert_eq!(limit.loan_to_value_ratio, dec!(0.50));
    }

    #[test]
    fn test_land_floors_fraction() {
        // 333_333 * 0.60 = 199_999.8
        let limit = max_loan(CollateralCategory::Land, dec!(333_333)).unwrap();
        assert_eq!(limit.max_principal, dec!(199_999));
    }

    #[test]
    fn test_equipment_ratio() {
        let limit = max_loan(CollateralCategory::Equipment, dec!(100_000)).unwrap();
        assert_eq!(limit.max_principal, dec!(30_000));
    }

    #[test]
    fn test_fractional_asset_value() {
        // 1_001.99 * 0.30 = 300.597
        let limit = max_loan(CollateralCategory::Equipment, dec!(1_001.99)).unwrap();
        assert_eq!(limit.max_principal, dec!(300));
    }

    #[test]
    fn test_small_asset_floors_to_zero() {
        let limit = max_loan(CollateralCategory::Equipment, dec!(3)).unwrap();
        assert_eq!(limit.max_principal, Decimal::ZERO);
    }

    #[test]
    fn test_non_positive_asset_rejected() {
        for value in [Decimal::ZERO, dec!(-10_000)] {
            match max_loan(CollateralCategory::Land, value).unwrap_err() {
                LoanDeskError::InvalidAmount { field, .. } => assert_eq!(field, "asset_value"),
                other => panic!("Expected InvalidAmount, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_category() {
        assert_eq!("vehicle".parse::<CollateralCategory>().unwrap(), CollateralCategory::Vehicle);
        assert_eq!(" Land ".parse::<CollateralCategory>().unwrap(), CollateralCategory::Land);
        assert_eq!("EQUIPMENT".parse::<CollateralCategory>().unwrap(), CollateralCategory::Equipment);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let input = CollateralSizingInput {
            category: "boat".into(),
            asset_value: dec!(10_000),
        };
        match size_collateral(&input).unwrap_err() {
            LoanDeskError::UnknownCollateralCategory(name) => assert_eq!(name, "boat"),
            other => panic!("Expected UnknownCollateralCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&CollateralCategory::Equipment).unwrap();
        assert_eq!(json, "\"equipment\"");
        assert!(serde_json::from_str::<CollateralCategory>("\"boat\"").is_err());
    }

    #[test]
    fn test_size_collateral_envelope() {
        let input = CollateralSizingInput {
            category: "vehicle".into(),
            asset_value: dec!(500_000),
        };
        let out = size_collateral(&input).unwrap();
        assert_eq!(out.result.max_principal, dec!(250_000));
        assert_eq!(out.assumptions["ltv_ratios"]["land"], "0.60");
    }
}
