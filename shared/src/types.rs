//! Common types used across the client

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for GpsCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Free-form recommendation preference overrides (e.g. crop-type filters).
///
/// No schema is enforced client-side; the map is forwarded as-is.
pub type Preferences = serde_json::Map<String, serde_json::Value>;

/// Serde adapter carrying a [`Decimal`] as a JSON number
///
/// The backend contract transmits numeric inputs as JSON numbers, not strings.
pub mod decimal_number {
    use std::str::FromStr;

    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value.to_f64() {
            Some(number) => serializer.serialize_f64(number),
            None => Err(serde::ser::Error::custom("decimal out of range")),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        from_f64(f64::deserialize(deserializer)?)
    }

    /// Convert through the shortest round-trip representation, so `28.6139`
    /// stays `28.6139` rather than its binary expansion
    pub(crate) fn from_f64<E: de::Error>(number: f64) -> Result<Decimal, E> {
        if !number.is_finite() {
            return Err(E::custom("number must be finite"));
        }
        Decimal::from_str(&number.to_string())
            .map_err(|_| E::custom(format!("number {} is out of range", number)))
    }
}

/// Optional variant of [`decimal_number`]; `null` and absent are both `None`
pub mod decimal_number_opt {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => super::decimal_number::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<f64>::deserialize(deserializer)?
            .map(super::decimal_number::from_f64::<D::Error>)
            .transpose()
    }
}
