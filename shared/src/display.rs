//! Display formatting shared by the CLI and the browser front end

use rust_decimal::{Decimal, RoundingStrategy};

/// Default currency symbol for profit figures
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Render a fraction as a percentage, e.g. `0.87` → `87.0%`
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

/// Suitability score as shown on a recommendation card
pub fn format_suitability(score: f64) -> String {
    format_percent(score, 1)
}

/// Sustainability score as a whole percentage
pub fn format_sustainability(score: f64) -> String {
    format_percent(score, 0)
}

/// Diagnosis confidence with one decimal place
pub fn format_confidence(confidence: f64) -> String {
    format_percent(confidence, 1)
}

/// Expected yield, e.g. `4.50 tons/ha`
pub fn format_yield(tons_per_hectare: Decimal) -> String {
    format!("{} tons/ha", fixed(tons_per_hectare, 2))
}

/// Expected profit with a currency symbol, e.g. `₹25000.00/ha`
///
/// Losses keep the sign ahead of the symbol: `-₹1200.00/ha`.
pub fn format_profit(amount: Decimal, currency_symbol: &str) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}/ha", sign, currency_symbol, fixed(amount.abs(), 2))
}

/// Round half away from zero and pad to exactly `dp` decimal places
fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_confidence_one_decimal() {
        assert_eq!(format_confidence(0.87), "87.0%");
        assert_eq!(format_confidence(0.8766), "87.7%");
        assert_eq!(format_confidence(1.0), "100.0%");
    }

    #[test]
    fn test_scores() {
        assert_eq!(format_suitability(0.92), "92.0%");
        assert_eq!(format_sustainability(0.8), "80%");
    }

    #[test]
    fn test_yield_two_decimals() {
        assert_eq!(format_yield(dec("4.5")), "4.50 tons/ha");
        assert_eq!(format_yield(dec("4.025")), "4.03 tons/ha");
    }

    #[test]
    fn test_profit_with_symbol() {
        assert_eq!(format_profit(dec("25000"), DEFAULT_CURRENCY_SYMBOL), "₹25000.00/ha");
        assert_eq!(format_profit(dec("-1200.5"), "$"), "-$1200.50/ha");
        assert_eq!(format_profit(Decimal::ZERO, "€"), "€0.00/ha");
    }
}
