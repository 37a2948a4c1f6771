//! Field → recommendation → diagnosis workflow
//!
//! Each workflow owns its components' state; the created field id is handed
//! from intake to the retriever explicitly.

use shared::{CropRecommendation, Diagnosis, Field, FieldForm, LeafImage};

use super::diagnosis::DiagnosisRequester;
use super::intake::FieldIntake;
use super::recommendations::RecommendationRetriever;
use crate::error::ClientResult;
use crate::external::ApiClient;

#[derive(Debug)]
pub struct Workflow {
    api: ApiClient,
    intake: FieldIntake,
    retriever: RecommendationRetriever,
    diagnosis: DiagnosisRequester,
}

impl Workflow {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            intake: FieldIntake::new(),
            retriever: RecommendationRetriever::new(),
            diagnosis: DiagnosisRequester::new(),
        }
    }

    pub fn with_form(api: ApiClient, form: FieldForm) -> Self {
        Self {
            intake: FieldIntake::with_form(form),
            ..Self::new(api)
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn intake(&self) -> &FieldIntake {
        &self.intake
    }

    pub fn intake_mut(&mut self) -> &mut FieldIntake {
        &mut self.intake
    }

    pub fn retriever(&self) -> &RecommendationRetriever {
        &self.retriever
    }

    pub fn retriever_mut(&mut self) -> &mut RecommendationRetriever {
        &mut self.retriever
    }

    pub fn diagnosis(&self) -> &DiagnosisRequester {
        &self.diagnosis
    }

    /// Create the field described by the form
    pub async fn submit_field(&mut self) -> ClientResult<Option<Field>> {
        self.intake.submit(&self.api).await
    }

    /// Create the field, then show its recommendations
    ///
    /// Returns `Ok(None)` when a submission is already outstanding. A
    /// recommendation failure is returned after the field was created; the
    /// field stays available from [`Workflow::intake`].
    pub async fn submit_field_and_recommend(
        &mut self,
    ) -> ClientResult<Option<(Field, Vec<CropRecommendation>)>> {
        let Some(field) = self.intake.submit(&self.api).await? else {
            return Ok(None);
        };

        let recommendations = self
            .retriever
            .display(&self.api, field.id.clone())
            .await?
            .to_vec();
        Ok(Some((field, recommendations)))
    }

    /// Diagnose a leaf image, replacing any previous selection
    pub async fn diagnose(&mut self, image: LeafImage) -> ClientResult<Diagnosis> {
        self.diagnosis.select_image(image);
        self.diagnosis.submit(&self.api).await
    }
}
