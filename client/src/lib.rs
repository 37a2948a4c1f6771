//! Crop Advisor client
//!
//! Field intake, crop recommendations and leaf disease diagnosis against a
//! remote advisory backend.

pub mod config;
pub mod error;
pub mod external;
pub mod render;
pub mod services;

pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use external::ApiClient;
pub use services::{
    DiagnosisRequester, FieldIntake, RecommendationRetriever, SubmissionState, Workflow,
};
