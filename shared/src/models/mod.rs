//! Domain models for the Crop Advisor client

mod diagnosis;
mod field;
mod recommendation;

pub use diagnosis::*;
pub use field::*;
pub use recommendation::*;
