//! Leaf disease diagnosis models

use serde::{Deserialize, Serialize};

use crate::validation::{is_unit_fraction, ValidationError};

/// Backend-inferred disease label and treatment for one leaf image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub disease: String,
    /// Fraction in [0, 1]
    pub confidence: f64,
    pub treatment: String,
}

impl Diagnosis {
    /// Boundary check applied to the backend response
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.disease.trim().is_empty() {
            return Err(ValidationError::new("disease", "must not be empty"));
        }
        if !is_unit_fraction(self.confidence) {
            return Err(ValidationError::new(
                "confidence",
                "must be a fraction between 0 and 1",
            ));
        }
        Ok(())
    }
}

/// A leaf photograph ready for upload
///
/// Only image-typed payloads are accepted. Size and format policies are
/// advisory copy in the front end, not enforced here.
#[derive(Clone, PartialEq, Eq)]
pub struct LeafImage {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl LeafImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let content_type = content_type.into().trim().to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(ValidationError::new("image", "must be an image file"));
        }
        if bytes.is_empty() {
            return Err(ValidationError::new("image", "must not be empty"));
        }

        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    /// Build from a file name, inferring the content type from its extension
    pub fn from_file_name(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let file_name = file_name.into();
        let content_type = image_content_type(&file_name)
            .ok_or(ValidationError::new("image", "must be an image file"))?;
        Self::new(file_name, content_type, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for LeafImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeafImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Content type for common image file extensions
pub fn image_content_type(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}
