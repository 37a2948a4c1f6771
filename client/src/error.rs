//! Error handling for the Crop Advisor client
//!
//! Every remote failure is caught at the operation boundary and converted into
//! the operation's error kind. Sub-kinds (not found, server error, timeout,
//! malformed body) are kept only in the diagnostic message.

use serde::Serialize;
use shared::ValidationError;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    // Input errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // Remote operation errors
    #[error("Field creation failed: {0}")]
    FieldCreation(String),

    #[error("Field lookup failed: {0}")]
    FieldFetch(String),

    #[error("Recommendation fetch failed: {0}")]
    RecommendationFetch(String),

    #[error("Diagnosis failed: {0}")]
    Diagnosis(String),

    // Setup errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error payload for machine-readable output
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl ClientError {
    /// Stable machine code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::FieldCreation(_) => "FIELD_CREATION_ERROR",
            ClientError::FieldFetch(_) => "FIELD_FETCH_ERROR",
            ClientError::RecommendationFetch(_) => "RECOMMENDATION_FETCH_ERROR",
            ClientError::Diagnosis(_) => "DIAGNOSIS_ERROR",
            ClientError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Generic failure text shown to the grower
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "Please check the highlighted value and try again.",
            ClientError::FieldCreation(_) => "Failed to create field. Please try again.",
            ClientError::FieldFetch(_) => "Failed to load field. Please try again.",
            ClientError::RecommendationFetch(_) => {
                "Failed to load recommendations. Please try again."
            }
            ClientError::Diagnosis(_) => "Failed to diagnose disease. Please try again.",
            ClientError::Configuration(_) => "The client is not configured correctly.",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let field = match self {
            ClientError::Validation(err) => Some(err.field),
            _ => None,
        };

        ErrorResponse {
            error: ErrorDetail {
                code: self.code(),
                message: self.user_message().to_string(),
                detail: self.to_string(),
                field,
            },
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
