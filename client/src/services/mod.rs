//! Workflow components and their submission state

pub mod diagnosis;
pub mod intake;
pub mod recommendations;
pub mod state;
pub mod workflow;

pub use diagnosis::{DiagnosisRequester, PendingDiagnosis};
pub use intake::{FieldIntake, PendingField};
pub use recommendations::{PendingRecommendations, RecommendationRetriever};
pub use state::{Completed, ResultSlot, SubmissionState, Ticket};
pub use workflow::Workflow;
