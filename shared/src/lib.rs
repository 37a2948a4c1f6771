//! Shared types and models for the Crop Advisor client
//!
//! This crate contains the field, recommendation and diagnosis model shared
//! between the native client, the browser front end (via WASM) and tests.

pub mod display;
pub mod models;
pub mod types;
pub mod validation;

pub use display::*;
pub use models::*;
pub use types::*;
pub use validation::*;
