//! WebAssembly module for the Crop Advisor front end
//!
//! Provides client-side helpers for:
//! - Field form validation before submission
//! - Recommendation ranking checks
//! - Display formatting of scores, yields and profit

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use shared::{
    best_match, format_confidence, format_profit, format_suitability, format_yield,
    image_content_type, is_ranked_by_suitability, CropRecommendation, FieldForm,
};

/// Validate a field form and return the attributes to submit as JSON
#[wasm_bindgen]
pub fn validate_field_form(form_json: &str) -> Result<String, JsValue> {
    normalize_field_form(form_json).map_err(|e| JsValue::from_str(&e))
}

/// Whether the backend's recommendations arrive in descending suitability
#[wasm_bindgen]
pub fn recommendations_are_ranked(recommendations_json: &str) -> Result<bool, JsValue> {
    parse_recommendations(recommendations_json)
        .map(|recs| is_ranked_by_suitability(&recs))
        .map_err(|e| JsValue::from_str(&e))
}

/// Crop shown as "best match", if any
#[wasm_bindgen]
pub fn best_match_crop(recommendations_json: &str) -> Result<Option<String>, JsValue> {
    parse_recommendations(recommendations_json)
        .map(|recs| best_match(&recs).map(|rec| rec.crop.clone()))
        .map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn confidence_text(confidence: f64) -> String {
    format_confidence(confidence)
}

#[wasm_bindgen]
pub fn suitability_text(score: f64) -> String {
    format_suitability(score)
}

#[wasm_bindgen]
pub fn yield_text(tons_per_hectare: f64) -> Result<String, JsValue> {
    to_decimal(tons_per_hectare)
        .map(format_yield)
        .map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn profit_text(amount: f64, currency_symbol: &str) -> Result<String, JsValue> {
    to_decimal(amount)
        .map(|amount| format_profit(amount, currency_symbol))
        .map_err(|e| JsValue::from_str(&e))
}

/// Whether a selected file looks like an image the diagnosis upload accepts
#[wasm_bindgen]
pub fn is_image_file(file_name: &str) -> bool {
    image_content_type(file_name).is_some()
}

fn normalize_field_form(form_json: &str) -> Result<String, String> {
    let form: FieldForm =
        serde_json::from_str(form_json).map_err(|e| format!("Invalid form JSON: {}", e))?;
    let attributes = form.parse().map_err(|e| e.to_string())?;
    serde_json::to_string(&attributes).map_err(|e| e.to_string())
}

/// NaN, infinities and magnitudes beyond a decimal are refused
fn to_decimal(value: f64) -> Result<Decimal, String> {
    Decimal::try_from(value).map_err(|_| format!("{} cannot be displayed as an amount", value))
}

fn parse_recommendations(json: &str) -> Result<Vec<CropRecommendation>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid recommendations JSON: {}", e))
}
