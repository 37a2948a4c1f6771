//! Crop recommendation models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::FieldId;
use crate::types::Preferences;
use crate::validation::{is_unit_fraction, ValidationError};

/// One backend-ranked crop suggestion for a field
///
/// Ephemeral: recomputed on every request and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub crop: String,
    /// Fraction in [0, 1]; the sequence arrives sorted descending by this
    #[serde(alias = "suitability_score")]
    pub suitability_score: f64,
    /// Tons per hectare
    #[serde(alias = "expected_yield", with = "crate::types::decimal_number")]
    pub expected_yield: Decimal,
    /// Currency units per hectare, negative when the model predicts a loss
    #[serde(alias = "expected_profit", with = "crate::types::decimal_number")]
    pub expected_profit: Decimal,
    #[serde(alias = "sustainability_score")]
    pub sustainability_score: f64,
    /// Justifications in display order
    #[serde(default)]
    pub explanation: Vec<String>,
}

impl CropRecommendation {
    /// Boundary check applied to every entry the backend returns
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.crop.trim().is_empty() {
            return Err(ValidationError::new("crop", "must not be empty"));
        }
        if !is_unit_fraction(self.suitability_score) {
            return Err(ValidationError::new(
                "suitabilityScore",
                "must be a fraction between 0 and 1",
            ));
        }
        if !is_unit_fraction(self.sustainability_score) {
            return Err(ValidationError::new(
                "sustainabilityScore",
                "must be a fraction between 0 and 1",
            ));
        }
        if self.expected_yield < Decimal::ZERO {
            return Err(ValidationError::new("expectedYield", "cannot be negative"));
        }
        Ok(())
    }
}

/// Body of `POST /recommend`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub field_id: FieldId,
    /// Sent as `{}` when the caller has no overrides
    #[serde(default)]
    pub preferences: Preferences,
}

impl RecommendationRequest {
    pub fn new(field_id: FieldId, preferences: Option<Preferences>) -> Self {
        Self {
            field_id,
            preferences: preferences.unwrap_or_default(),
        }
    }
}

/// Body returned by `POST /recommend`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<CropRecommendation>,
}

impl RecommendationResponse {
    /// Check every entry, failing on the first malformed one
    pub fn check(&self) -> Result<(), ValidationError> {
        self.recommendations.iter().try_for_each(CropRecommendation::check)
    }
}

/// Whether the sequence is non-increasing in suitability score
///
/// Only inspects; the client never reorders what the backend ranked.
pub fn is_ranked_by_suitability(recommendations: &[CropRecommendation]) -> bool {
    recommendations
        .windows(2)
        .all(|pair| pair[0].suitability_score >= pair[1].suitability_score)
}

/// The entry rendered as "best match"
pub fn best_match(recommendations: &[CropRecommendation]) -> Option<&CropRecommendation> {
    recommendations.first()
}
