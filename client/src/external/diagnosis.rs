//! Leaf disease diagnosis upload

use std::path::Path;

use reqwest::multipart::{Form, Part};
use shared::{Diagnosis, LeafImage};

use super::{ApiClient, Operation};
use crate::error::ClientResult;

/// Multipart part name the backend reads the image from
pub const IMAGE_PART: &str = "image";

impl ApiClient {
    /// Submit one leaf image for diagnosis (`POST /diagnose`, multipart)
    ///
    /// Each call is evaluated independently; nothing is cached.
    pub async fn diagnose_disease(&self, image: &LeafImage) -> ClientResult<Diagnosis> {
        let operation = Operation::Diagnose;
        let url = self.endpoint(operation, &["diagnose"])?;

        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.content_type())
            .map_err(|e| operation.error(format!("Invalid image content type: {}", e)))?;
        let form = Form::new().part(IMAGE_PART, part);

        let diagnosis: Diagnosis = self
            .execute(operation, self.http_client.post(url).multipart(form))
            .await?;

        diagnosis.check().map_err(|e| {
            tracing::error!(file = image.file_name(), "Malformed diagnosis: {}", e);
            operation.error(format!("Malformed diagnosis: {}", e))
        })?;

        tracing::info!(
            file = image.file_name(),
            disease = %diagnosis.disease,
            confidence = diagnosis.confidence,
            "Diagnosis received"
        );
        Ok(diagnosis)
    }
}

/// Read an image file from disk, inferring its content type from the extension
pub async fn load_leaf_image(path: &Path) -> ClientResult<LeafImage> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();

    // Reject non-image names before touching the disk
    if shared::image_content_type(&file_name).is_none() {
        return Err(shared::ValidationError::new("image", "must be an image file").into());
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        Operation::Diagnose.error(format!("Could not read {}: {}", path.display(), e))
    })?;

    Ok(LeafImage::from_file_name(file_name, bytes)?)
}
