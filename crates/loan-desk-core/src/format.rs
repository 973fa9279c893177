//! Currency presentation. Rounding happens only here, never in the engine.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Money;

/// Format an amount as whole Kenyan shillings, e.g. `KES 12,345`.
pub fn format_kes(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("KES {sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_grouping() {
        assert_eq!(format_kes(dec!(0)), "KES 0");
        assert_eq!(format_kes(dec!(999)), "KES 999");
        assert_eq!(format_kes(dec!(1_000)), "KES 1,000");
        assert_eq!(format_kes(dec!(500_000)), "KES 500,000");
        assert_eq!(format_kes(dec!(1_234_567)), "KES 1,234,567");
    }

    #[test]
    fn test_rounds_to_whole_shillings() {
        assert_eq!(format_kes(dec!(16_000) / dec!(3)), "KES 5,333");
        assert_eq!(format_kes(dec!(2.5)), "KES 3");
        assert_eq!(format_kes(dec!(1_999.49)), "KES 1,999");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_kes(dec!(-12_345.6)), "KES -12,346");
    }
}
