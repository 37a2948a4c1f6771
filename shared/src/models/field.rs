//! Field models

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::types::GpsCoordinates;
use crate::validation::{
    parse_number, parse_optional_number, validate_field_attributes, ValidationError,
};

/// Backend-assigned field identifier
///
/// Opaque to the client. The backend may hand out numeric ids; they are kept
/// in their decimal string form so callers never need to convert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Integer(u64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(id) if id.trim().is_empty() => {
                Err(de::Error::custom("field id must not be empty"))
            }
            Repr::Text(id) => Ok(Self(id)),
            Repr::Integer(id) => Ok(Self(id.to_string())),
        }
    }
}

/// Location and soil attributes of one field, as submitted for creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAttributes {
    #[serde(with = "crate::types::decimal_number")]
    pub latitude: Decimal,
    #[serde(with = "crate::types::decimal_number")]
    pub longitude: Decimal,
    /// Area in hectares
    #[serde(with = "crate::types::decimal_number")]
    pub area: Decimal,
    #[serde(default, with = "crate::types::decimal_number_opt")]
    pub soil_ph: Option<Decimal>,
    /// Nitrogen, kg/ha
    #[serde(default, with = "crate::types::decimal_number_opt")]
    pub soil_n: Option<Decimal>,
    /// Phosphorus, kg/ha
    #[serde(default, with = "crate::types::decimal_number_opt")]
    pub soil_p: Option<Decimal>,
    /// Potassium, kg/ha
    #[serde(default, with = "crate::types::decimal_number_opt")]
    pub soil_k: Option<Decimal>,
    #[serde(default)]
    pub last_crop: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub irrigation_available: bool,
}

impl FieldAttributes {
    /// Attributes with only the mandatory values set
    pub fn new(latitude: Decimal, longitude: Decimal, area: Decimal) -> Self {
        Self {
            latitude,
            longitude,
            area,
            soil_ph: None,
            soil_n: None,
            soil_p: None,
            soil_k: None,
            last_crop: None,
            irrigation_available: false,
        }
    }

    pub fn coordinates(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.latitude, self.longitude)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_field_attributes(self)
    }
}

/// The reference backend stores irrigation as a nullable column
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// A created field, as returned by the backend
///
/// Immutable from the client's side: there is no update operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    #[serde(flatten)]
    pub attributes: FieldAttributes,
    /// Populated by the backend when soil lab data is available
    #[serde(
        default,
        with = "crate::types::decimal_number_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub organic_carbon: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Raw field intake form, exactly as typed by the grower
///
/// Every numeric input is kept as text until [`FieldForm::parse`] runs, so a
/// failed submission leaves the form populated for a retry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldForm {
    pub latitude: String,
    pub longitude: String,
    pub area: String,
    pub soil_ph: String,
    pub soil_n: String,
    pub soil_p: String,
    pub soil_k: String,
    pub last_crop: String,
    pub irrigation_available: bool,
}

impl FieldForm {
    /// Parse and validate the form into submittable attributes
    pub fn parse(&self) -> Result<FieldAttributes, ValidationError> {
        let last_crop = self.last_crop.trim();

        let attributes = FieldAttributes {
            latitude: parse_number("latitude", &self.latitude)?,
            longitude: parse_number("longitude", &self.longitude)?,
            area: parse_number("area", &self.area)?,
            soil_ph: parse_optional_number("soilPh", &self.soil_ph)?,
            soil_n: parse_optional_number("soilN", &self.soil_n)?,
            soil_p: parse_optional_number("soilP", &self.soil_p)?,
            soil_k: parse_optional_number("soilK", &self.soil_k)?,
            last_crop: (!last_crop.is_empty()).then(|| last_crop.to_string()),
            irrigation_available: self.irrigation_available,
        };

        attributes.validate()?;
        Ok(attributes)
    }
}

impl From<&FieldAttributes> for FieldForm {
    fn from(attributes: &FieldAttributes) -> Self {
        let text = |value: Option<Decimal>| value.map(|v| v.to_string()).unwrap_or_default();

        FieldForm {
            latitude: attributes.latitude.to_string(),
            longitude: attributes.longitude.to_string(),
            area: attributes.area.to_string(),
            soil_ph: text(attributes.soil_ph),
            soil_n: text(attributes.soil_n),
            soil_p: text(attributes.soil_p),
            soil_k: text(attributes.soil_k),
            last_crop: attributes.last_crop.clone().unwrap_or_default(),
            irrigation_available: attributes.irrigation_available,
        }
    }
}
