//! Recommendation retrieval for the field currently on display

use shared::{CropRecommendation, FieldId, Preferences};

use super::state::{Completed, ResultSlot, SubmissionState, Ticket};
use crate::error::ClientResult;
use crate::external::ApiClient;

/// A recommendation request ready to be sent
#[derive(Debug)]
pub struct PendingRecommendations {
    ticket: Ticket<FieldId>,
    preferences: Option<Preferences>,
}

impl PendingRecommendations {
    pub fn ticket(&self) -> &Ticket<FieldId> {
        &self.ticket
    }

    pub fn field_id(&self) -> &FieldId {
        self.ticket.key()
    }

    pub async fn send(self, api: &ApiClient) -> Completed<FieldId, Vec<CropRecommendation>> {
        let outcome = api
            .get_recommendations(self.ticket.key(), self.preferences)
            .await;
        Completed {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// Shows the ranked recommendations for one field at a time
///
/// Fetches on first display and whenever the displayed field changes.
/// Responses for a field that is no longer displayed are dropped.
#[derive(Debug, Default)]
pub struct RecommendationRetriever {
    displayed: Option<FieldId>,
    preferences: Option<Preferences>,
    slot: ResultSlot<FieldId, Vec<CropRecommendation>>,
}

impl RecommendationRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn displayed(&self) -> Option<&FieldId> {
        self.displayed.as_ref()
    }

    pub fn preferences(&self) -> Option<&Preferences> {
        self.preferences.as_ref()
    }

    /// Held for the next fetch; does not trigger one
    pub fn set_preferences(&mut self, preferences: Option<Preferences>) {
        self.preferences = preferences;
    }

    pub fn state(&self) -> &SubmissionState<Vec<CropRecommendation>> {
        self.slot.state()
    }

    /// Recommendations in backend order; empty until a fetch succeeds
    pub fn recommendations(&self) -> &[CropRecommendation] {
        self.slot.state().result().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Display `field_id`, returning a request when a fetch is due
    pub fn show(&mut self, field_id: FieldId) -> Option<PendingRecommendations> {
        if self.displayed.as_ref() == Some(&field_id) {
            return None;
        }

        tracing::debug!(%field_id, "Displaying recommendations");
        self.displayed = Some(field_id.clone());
        Some(self.request(field_id))
    }

    /// User-initiated retry for the displayed field
    pub fn reload(&mut self) -> Option<PendingRecommendations> {
        let field_id = self.displayed.clone()?;
        Some(self.request(field_id))
    }

    /// The view went away; late responses are discarded
    pub fn close(&mut self) {
        self.displayed = None;
        self.slot.close();
    }

    pub fn apply(&mut self, completed: Completed<FieldId, Vec<CropRecommendation>>) -> bool {
        self.slot.apply(completed)
    }

    /// Show `field_id` and wait for its recommendations
    pub async fn display(
        &mut self,
        api: &ApiClient,
        field_id: FieldId,
    ) -> ClientResult<&[CropRecommendation]> {
        if let Some(pending) = self.show(field_id) {
            let completed = pending.send(api).await;
            self.apply(completed);
        }

        match self.slot.state().error() {
            Some(error) => Err(error.clone()),
            None => Ok(self.recommendations()),
        }
    }

    fn request(&mut self, field_id: FieldId) -> PendingRecommendations {
        PendingRecommendations {
            ticket: self.slot.begin(field_id),
            preferences: self.preferences.clone(),
        }
    }
}
