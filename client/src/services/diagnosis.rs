//! Leaf image selection and diagnosis

use shared::{Diagnosis, LeafImage, ValidationError};

use super::state::{Completed, ResultSlot, SubmissionState, Ticket};
use crate::error::ClientResult;
use crate::external::ApiClient;

/// A diagnosis upload ready to be sent
#[derive(Debug)]
pub struct PendingDiagnosis {
    ticket: Ticket<u64>,
    image: LeafImage,
}

impl PendingDiagnosis {
    pub fn ticket(&self) -> &Ticket<u64> {
        &self.ticket
    }

    pub fn image(&self) -> &LeafImage {
        &self.image
    }

    pub async fn send(self, api: &ApiClient) -> Completed<u64, Diagnosis> {
        let outcome = api.diagnose_disease(&self.image).await;
        Completed {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// Holds the selected leaf image and its latest diagnosis
#[derive(Debug, Default)]
pub struct DiagnosisRequester {
    image: Option<LeafImage>,
    selection: u64,
    slot: ResultSlot<u64, Diagnosis>,
}

impl DiagnosisRequester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&LeafImage> {
        self.image.as_ref()
    }

    pub fn state(&self) -> &SubmissionState<Diagnosis> {
        self.slot.state()
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        self.slot.state().result()
    }

    /// Select a new image, discarding any previous result
    pub fn select_image(&mut self, image: LeafImage) {
        tracing::debug!(file = image.file_name(), bytes = image.len(), "Leaf image selected");
        self.image = Some(image);
        self.selection += 1;
        self.slot.reset();
    }

    /// Remove the selected image and its result
    pub fn clear_image(&mut self) {
        self.image = None;
        self.selection += 1;
        self.slot.reset();
    }

    /// Start a diagnosis of the selected image
    ///
    /// Resubmission is always allowed; it supersedes an outstanding request.
    pub fn prepare(&mut self) -> ClientResult<PendingDiagnosis> {
        let Some(image) = self.image.clone() else {
            let error = ValidationError::new("image", "is required");
            self.slot.fail(self.selection, error.clone().into());
            return Err(error.into());
        };

        Ok(PendingDiagnosis {
            ticket: self.slot.begin(self.selection),
            image,
        })
    }

    pub fn apply(&mut self, completed: Completed<u64, Diagnosis>) -> bool {
        self.slot.apply(completed)
    }

    /// Upload the selected image and record the outcome
    pub async fn submit(&mut self, api: &ApiClient) -> ClientResult<Diagnosis> {
        let completed = self.prepare()?.send(api).await;
        let outcome = completed.outcome.clone();
        self.apply(completed);
        outcome
    }
}
