//! Client-side validation for field intake
//!
//! Only basic numeric and range checks happen here. Anything deeper is the
//! backend's call and comes back as a generic creation failure.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::FieldAttributes;

/// Malformed or out-of-range input, caught before submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Wire name of the offending input
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Inclusive soil pH bounds
pub const SOIL_PH_MIN: Decimal = Decimal::ZERO;
pub const SOIL_PH_MAX: Decimal = Decimal::from_parts(14, 0, 0, false, 0);

// ============================================================================
// Numeric Parsing
// ============================================================================

/// Parse a form input as a decimal number
///
/// Accepts plain (`28.6139`) and scientific (`2.5e1`) notation. Blank input,
/// `NaN` and infinities are rejected, as are finite values beyond the range or
/// precision of a decimal (`1e40`, `1e-40`).
pub fn parse_number(field: &'static str, input: &str) -> Result<Decimal, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| match trimmed.parse::<f64>() {
            // A real number, just not representable as a decimal
            Ok(number) if number.is_finite() => ValidationError::new(field, "is out of range"),
            _ => ValidationError::new(field, "must be a finite number"),
        })
}

/// Parse an optional form input; blank means absent
pub fn parse_optional_number(
    field: &'static str,
    input: &str,
) -> Result<Option<Decimal>, ValidationError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_number(field, input).map(Some)
}

// ============================================================================
// Field Attribute Validations
// ============================================================================

/// Validate field area (hectares, strictly positive)
pub fn validate_area(area: Decimal) -> Result<(), ValidationError> {
    if area <= Decimal::ZERO {
        return Err(ValidationError::new("area", "must be greater than 0 hectares"));
    }
    Ok(())
}

/// Validate soil pH lies in [0, 14]
pub fn validate_soil_ph(ph: Decimal) -> Result<(), ValidationError> {
    if ph < SOIL_PH_MIN || ph > SOIL_PH_MAX {
        return Err(ValidationError::new("soilPh", "must be between 0 and 14"));
    }
    Ok(())
}

/// Validate a soil nutrient reading (kg/ha) is not negative
pub fn validate_nutrient(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::new(field, "cannot be negative"));
    }
    Ok(())
}

/// Validate a complete attribute set before it is submitted
///
/// Latitude and longitude are not range-checked; a decimal is always finite.
pub fn validate_field_attributes(attributes: &FieldAttributes) -> Result<(), ValidationError> {
    validate_area(attributes.area)?;

    if let Some(ph) = attributes.soil_ph {
        validate_soil_ph(ph)?;
    }

    for (field, value) in [
        ("soilN", attributes.soil_n),
        ("soilP", attributes.soil_p),
        ("soilK", attributes.soil_k),
    ] {
        if let Some(value) = value {
            validate_nutrient(field, value)?;
        }
    }

    Ok(())
}

// ============================================================================
// Response Checks
// ============================================================================

/// Check a backend-computed score is a finite fraction in [0, 1]
pub fn is_unit_fraction(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn attributes() -> FieldAttributes {
        FieldAttributes::new(dec("28.6139"), dec("77.2090"), dec("2.5"))
    }

    #[test]
    fn test_parse_number_plain_and_scientific() {
        assert_eq!(parse_number("area", "2.5").unwrap(), dec("2.5"));
        assert_eq!(parse_number("area", "  -12.75 ").unwrap(), dec("-12.75"));
        assert_eq!(parse_number("area", "2.5e1").unwrap(), dec("25"));
    }

    #[test]
    fn test_parse_number_rejects_non_numeric() {
        let err = parse_number("latitude", "north").unwrap_err();
        assert_eq!(err.field, "latitude");
        assert!(parse_number("latitude", "NaN").is_err());
        assert!(parse_number("latitude", "inf").is_err());
        assert_eq!(err.message, "must be a finite number");
    }

    #[test]
    fn test_parse_number_reports_unrepresentable_magnitude() {
        for input in ["1e-40", "1e40"] {
            let err = parse_number("area", input).unwrap_err();
            assert_eq!(err, ValidationError::new("area", "is out of range"));
        }
        assert_eq!(
            parse_number("area", "NaN").unwrap_err().message,
            "must be a finite number"
        );
    }

    #[test]
    fn test_parse_number_requires_value() {
        let err = parse_number("longitude", "   ").unwrap_err();
        assert_eq!(err, ValidationError::new("longitude", "is required"));
    }

    #[test]
    fn test_parse_optional_number() {
        assert_eq!(parse_optional_number("soilN", "").unwrap(), None);
        assert_eq!(parse_optional_number("soilN", "40").unwrap(), Some(dec("40")));
        assert!(parse_optional_number("soilN", "forty").is_err());
    }

    #[test]
    fn test_validate_area() {
        assert!(validate_area(dec("0.01")).is_ok());
        assert!(validate_area(Decimal::ZERO).is_err());
        assert!(validate_area(dec("-1")).is_err());
    }

    #[test]
    fn test_validate_soil_ph_bounds() {
        assert!(validate_soil_ph(Decimal::ZERO).is_ok());
        assert!(validate_soil_ph(dec("6.8")).is_ok());
        assert!(validate_soil_ph(dec("14")).is_ok());
        assert!(validate_soil_ph(dec("14.01")).is_err());
        assert!(validate_soil_ph(dec("-0.1")).is_err());
    }

    #[test]
    fn test_validate_field_attributes_reports_first_nutrient() {
        let mut attrs = attributes();
        attrs.soil_p = Some(dec("-3"));
        attrs.soil_k = Some(dec("-1"));

        let err = validate_field_attributes(&attrs).unwrap_err();
        assert_eq!(err.field, "soilP");
    }

    #[test]
    fn test_unit_fraction() {
        assert!(is_unit_fraction(0.0));
        assert!(is_unit_fraction(0.92));
        assert!(is_unit_fraction(1.0));
        assert!(!is_unit_fraction(1.2));
        assert!(!is_unit_fraction(f64::NAN));
    }

    fn ph_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=1400i64).prop_map(|n| Decimal::new(n, 2)) // 0.00 to 14.00
    }

    fn nutrient_strategy() -> impl Strategy<Value = Option<Decimal>> {
        prop::option::of((0i64..=100_000i64).prop_map(|n| Decimal::new(n, 1)))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_attribute_sets_pass(
            lat in -900_000i64..=900_000i64,
            lon in -1_800_000i64..=1_800_000i64,
            area in 1i64..=100_000i64,
            ph in prop::option::of(ph_strategy()),
            n in nutrient_strategy(),
            p in nutrient_strategy(),
            k in nutrient_strategy(),
        ) {
            let mut attrs = FieldAttributes::new(
                Decimal::new(lat, 4),
                Decimal::new(lon, 4),
                Decimal::new(area, 2),
            );
            attrs.soil_ph = ph;
            attrs.soil_n = n;
            attrs.soil_p = p;
            attrs.soil_k = k;

            prop_assert!(validate_field_attributes(&attrs).is_ok());
        }

        #[test]
        fn prop_out_of_range_ph_fails(excess in 1i64..=10_000i64, below in any::<bool>()) {
            let ph = if below {
                -Decimal::new(excess, 2)
            } else {
                SOIL_PH_MAX + Decimal::new(excess, 2)
            };
            let mut attrs = attributes();
            attrs.soil_ph = Some(ph);

            prop_assert_eq!(validate_field_attributes(&attrs).unwrap_err().field, "soilPh");
        }
    }
}
