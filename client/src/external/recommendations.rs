//! Crop recommendation retrieval

use shared::{
    is_ranked_by_suitability, CropRecommendation, FieldId, Preferences, RecommendationRequest,
    RecommendationResponse,
};

use super::{ApiClient, Operation};
use crate::error::ClientResult;

impl ApiClient {
    /// Fetch ranked crop recommendations for a field (`POST /recommend`)
    ///
    /// The sequence is returned in backend order. An unranked sequence is
    /// logged but never re-sorted.
    pub async fn get_recommendations(
        &self,
        field_id: &FieldId,
        preferences: Option<Preferences>,
    ) -> ClientResult<Vec<CropRecommendation>> {
        let operation = Operation::Recommend;
        let url = self.endpoint(operation, &["recommend"])?;
        let request = RecommendationRequest::new(field_id.clone(), preferences);

        let response: RecommendationResponse = self
            .execute(operation, self.http_client.post(url).json(&request))
            .await?;

        response.check().map_err(|e| {
            tracing::error!(%field_id, "Malformed recommendation: {}", e);
            operation.error(format!("Malformed recommendation: {}", e))
        })?;

        if !is_ranked_by_suitability(&response.recommendations) {
            tracing::warn!(%field_id, "Recommendations are not ranked by suitability");
        }

        tracing::info!(
            %field_id,
            count = response.recommendations.len(),
            "Recommendations received"
        );
        Ok(response.recommendations)
    }
}
