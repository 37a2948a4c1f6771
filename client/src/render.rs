//! Plain-text rendering for the terminal

use shared::{
    format_confidence, format_profit, format_suitability, format_sustainability, format_yield,
    CropRecommendation, Diagnosis, Field,
};

use crate::error::ClientError;

/// Label placed on the first recommendation
pub const BEST_MATCH_LABEL: &str = "best match";

pub fn render_field(field: &Field) -> String {
    let attrs = &field.attributes;
    let optional = |value: Option<rust_decimal::Decimal>| {
        value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
    };

    let mut lines = vec![
        format!("Field {}", field.id),
        format!("  Location:    {}", attrs.coordinates()),
        format!("  Area:        {} ha", attrs.area),
        format!("  Soil pH:     {}", optional(attrs.soil_ph)),
        format!(
            "  N / P / K:   {} / {} / {} kg/ha",
            optional(attrs.soil_n),
            optional(attrs.soil_p),
            optional(attrs.soil_k)
        ),
        format!(
            "  Last crop:   {}",
            attrs.last_crop.as_deref().unwrap_or("-")
        ),
        format!(
            "  Irrigation:  {}",
            if attrs.irrigation_available { "yes" } else { "no" }
        ),
    ];
    if let Some(carbon) = field.organic_carbon {
        lines.push(format!("  Organic C:   {}", carbon));
    }
    lines.join("\n")
}

/// Render recommendations in the order given, marking the first as best match
pub fn render_recommendations(
    recommendations: &[CropRecommendation],
    currency_symbol: &str,
) -> String {
    if recommendations.is_empty() {
        return "No recommendations available.".to_string();
    }

    let mut lines = Vec::new();
    for (index, rec) in recommendations.iter().enumerate() {
        if index == 0 {
            lines.push(format!("{}. {} ({})", index + 1, rec.crop, BEST_MATCH_LABEL));
        } else {
            lines.push(format!("{}. {}", index + 1, rec.crop));
        }
        lines.push(format!(
            "   Suitability: {}  Sustainability: {}",
            format_suitability(rec.suitability_score),
            format_sustainability(rec.sustainability_score)
        ));
        lines.push(format!(
            "   Expected yield: {}  Expected profit: {}",
            format_yield(rec.expected_yield),
            format_profit(rec.expected_profit, currency_symbol)
        ));
        lines.extend(rec.explanation.iter().map(|reason| format!("   - {}", reason)));
    }
    lines.join("\n")
}

pub fn render_diagnosis(diagnosis: &Diagnosis) -> String {
    [
        format!("Disease:    {}", diagnosis.disease),
        format!("Confidence: {}", format_confidence(diagnosis.confidence)),
        format!("Treatment:  {}", diagnosis.treatment),
    ]
    .join("\n")
}

/// Generic failure text followed by the diagnostic detail
pub fn render_error(error: &ClientError) -> String {
    format!("{}\n  ({})", error.user_message(), error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::{FieldAttributes, FieldId};

    fn recommendation(crop: &str, suitability: f64) -> CropRecommendation {
        CropRecommendation {
            crop: crop.to_string(),
            suitability_score: suitability,
            expected_yield: Decimal::new(45, 1),
            expected_profit: Decimal::new(25000, 0),
            sustainability_score: 0.8,
            explanation: vec!["High soil nitrogen favors rice".to_string()],
        }
    }

    #[test]
    fn test_single_recommendation_is_best_match() {
        let text = render_recommendations(&[recommendation("Rice", 0.92)], "₹");

        assert!(text.starts_with("1. Rice (best match)"));
        assert!(text.contains("Suitability: 92.0%"));
        assert!(text.contains("Sustainability: 80%"));
        assert!(text.contains("4.50 tons/ha"));
        assert!(text.contains("₹25000.00/ha"));
        assert!(text.contains("- High soil nitrogen favors rice"));
    }

    #[test]
    fn test_given_order_is_preserved() {
        // Deliberately unranked: rendering must not reorder
        let recs = [recommendation("Maize", 0.3), recommendation("Rice", 0.9)];
        let text = render_recommendations(&recs, "$");

        let maize = text.find("Maize").unwrap();
        let rice = text.find("Rice").unwrap();
        assert!(maize < rice);
        assert!(text.contains("1. Maize (best match)"));
        assert!(text.contains("2. Rice\n"));
        assert_eq!(text.matches(BEST_MATCH_LABEL).count(), 1);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(render_recommendations(&[], "₹"), "No recommendations available.");
    }

    #[test]
    fn test_diagnosis_confidence() {
        let text = render_diagnosis(&Diagnosis {
            disease: "Leaf Blight".to_string(),
            confidence: 0.87,
            treatment: "Apply copper-based fungicide".to_string(),
        });
        assert!(text.contains("Confidence: 87.0%"));
        assert!(text.contains("Leaf Blight"));
    }

    #[test]
    fn test_field_shows_missing_values_as_dash() {
        let field = Field {
            id: FieldId::new("f-9"),
            attributes: FieldAttributes::new(Decimal::new(10, 0), Decimal::new(20, 0), Decimal::ONE),
            organic_carbon: None,
            created_at: None,
            updated_at: None,
        };
        let text = render_field(&field);
        assert!(text.starts_with("Field f-9"));
        assert!(text.contains("Soil pH:     -"));
        assert!(text.contains("Irrigation:  no"));
    }

    #[test]
    fn test_error_uses_generic_message() {
        let text = render_error(&ClientError::RecommendationFetch("API returned 404".into()));
        assert!(text.starts_with("Failed to load recommendations. Please try again."));
        assert!(text.contains("404"));
    }
}
