use loan_desk_core::policy::{EQUIPMENT_LTV, LAND_LTV, MONTHLY_INTEREST_RATE, VEHICLE_LTV};
use loan_desk_core::pricing::collateral::{self, CollateralCategory, CollateralSizingInput};
use loan_desk_core::pricing::pricer::{self, LoanPricingInput};
use loan_desk_core::LoanDeskError;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Worked scenarios
// ===========================================================================

#[test]
fn test_price_three_months() {
    let t = pricer::price(dec!(10_000), 3).unwrap();
    assert_eq!(t.raw_interest, dec!(6_000));
    assert_eq!(t.capped_interest, dec!(6_000));
    assert_eq!(t.total_repayment, dec!(16_000));
    assert_eq!(t.monthly_installment.round_dp(2), dec!(5_333.33));
    assert!(!t.interest_cap_applied);
}

#[test]
fn test_price_six_months_hits_duplum_cap() {
    let t = pricer::price(dec!(10_000), 6).unwrap();
    assert_eq!(t.raw_interest, dec!(12_000));
    assert_eq!(t.capped_interest, dec!(10_000));
    assert_eq!(t.total_repayment, dec!(20_000));
    assert_eq!(t.monthly_installment.round_dp(2), dec!(3_333.33));
    assert!(t.interest_cap_applied);
}

#[test]
fn test_price_five_months_boundary_not_capped() {
    let t = pricer::price(dec!(10_000), 5).unwrap();
    assert_eq!(t.raw_interest, dec!(10_000));
    assert_eq!(t.capped_interest, dec!(10_000));
    assert!(!t.interest_cap_applied);
}

#[test]
fn test_max_loan_vehicle() {
    let l = collateral::max_loan(CollateralCategory::Vehicle, dec!(500_000)).unwrap();
    assert_eq!(l.max_principal, dec!(250_000));
}

#[test]
fn test_max_loan_land_floors() {
    let l = collateral::max_loan(CollateralCategory::Land, dec!(333_333)).unwrap();
    assert_eq!(l.max_principal, dec!(199_999));
}

#[test]
fn test_negative_principal_is_invalid_amount() {
    assert!(matches!(
        pricer::price(dec!(-5), 3),
        Err(LoanDeskError::InvalidAmount { .. })
    ));
}

#[test]
fn test_unknown_category_boat() {
    let input = CollateralSizingInput {
        category: "boat".into(),
        asset_value: dec!(10_000),
    };
    assert!(matches!(
        collateral::size_collateral(&input),
        Err(LoanDeskError::UnknownCollateralCategory(_))
    ));
}

#[test]
fn test_envelopes_are_reproducible() {
    let input = LoanPricingInput {
        principal: dec!(123_456.78),
        term_months: dec!(7),
    };
    let a = serde_json::to_string(&pricer::price_loan(&input).unwrap()).unwrap();
    let b = serde_json::to_string(&pricer::price_loan(&input).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_terms_json_field_names() {
    let t = pricer::price(dec!(10_000), 3).unwrap();
    let v = serde_json::to_value(&t).unwrap();
    for key in [
        "principal",
        "monthly_rate",
        "term_months",
        "raw_interest",
        "capped_interest",
        "interest_cap_applied",
        "total_repayment",
        "monthly_installment",
    ] {
        assert!(v.get(key).is_some(), "missing field {key}");
    }
}

// ===========================================================================
// Properties
// ===========================================================================

fn principal_strategy() -> impl Strategy<Value = Decimal> {
    // 0.01 .. 10_000_000_000.00 in cents
    (1i64..1_000_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Any positive Decimal, including mantissas at full 28-place scale.
fn precise_principal_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=i64::MAX, 0u32..=28).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn ratio(category: CollateralCategory) -> Decimal {
    match category {
        CollateralCategory::Vehicle => VEHICLE_LTV,
        CollateralCategory::Equipment => EQUIPMENT_LTV,
        CollateralCategory::Land => LAND_LTV,
    }
}

fn category_strategy() -> impl Strategy<Value = CollateralCategory> {
    prop_oneof![
        Just(CollateralCategory::Vehicle),
        Just(CollateralCategory::Equipment),
        Just(CollateralCategory::Land),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_capped_interest_never_exceeds_principal(p in principal_strategy(), n in 1u32..10_000) {
        let t = pricer::price(p, n).unwrap();
        prop_assert!(t.capped_interest <= t.principal);
        prop_assert!(t.total_repayment <= t.principal * dec!(2));
    }

    #[test]
    fn prop_total_is_principal_plus_capped_interest(p in principal_strategy(), n in 1u32..10_000) {
        let t = pricer::price(p, n).unwrap();
        prop_assert_eq!(t.total_repayment, t.principal + t.capped_interest);
        prop_assert_eq!(t.raw_interest, p * MONTHLY_INTEREST_RATE * Decimal::from(n));
    }

    #[test]
    fn prop_installments_sum_to_total(p in principal_strategy(), n in 1u32..10_000) {
        let t = pricer::price(p, n).unwrap();
        let diff = (t.monthly_installment * Decimal::from(n) - t.total_repayment).abs();
        prop_assert!(diff < dec!(0.000001), "diff {} too large", diff);
    }

    #[test]
    fn prop_cap_applies_exactly_past_five_months(p in principal_strategy(), n in 1u32..10_000) {
        let t = pricer::price(p, n).unwrap();
        prop_assert_eq!(t.interest_cap_applied, n > 5);
    }

    #[test]
    fn prop_cap_boundary_independent_of_scale(p in precise_principal_strategy(), n in 1u32..10_000) {
        let t = pricer::price(p, n).unwrap();
        prop_assert_eq!(t.interest_cap_applied, n > 5);
        prop_assert!(t.capped_interest <= t.principal);
        if t.interest_cap_applied {
            prop_assert_eq!(t.capped_interest, t.principal);
        }
    }

    #[test]
    fn prop_pricing_is_idempotent(p in principal_strategy(), n in 1u32..10_000) {
        prop_assert_eq!(pricer::price(p, n).unwrap(), pricer::price(p, n).unwrap());
    }

    #[test]
    fn prop_max_loan_is_floor_of_ltv(c in category_strategy(), v in principal_strategy()) {
        let l = collateral::max_loan(c, v).unwrap();
        prop_assert_eq!(l.max_principal, (v * ratio(c)).floor());
        prop_assert!(l.max_principal <= v * ratio(c));
        prop_assert!(l.max_principal <= v);
        prop_assert!(v * ratio(c) - l.max_principal < Decimal::ONE);
        prop_assert_eq!(collateral::max_loan(c, v).unwrap(), l);
    }

    #[test]
    fn prop_non_positive_principal_rejected(cents in -1_000_000_000i64..=0, n in 1u32..100) {
        let is_invalid_amount = matches!(
            pricer::price(Decimal::new(cents, 2), n),
            Err(LoanDeskError::InvalidAmount { .. })
        );
        prop_assert!(is_invalid_amount);
    }
}
