//! Natural-language order intake
//!
//! Free text goes to the backend's extraction endpoint; a recognized
//! extraction is forwarded untouched to order acceptance.

pub mod errors;
pub mod models;
pub mod processor;
pub mod service;

pub use errors::{IntakeError, IntakeServiceError};
pub use models::{IntakeOutcome, OrderText};
pub use processor::Intake;
pub use service::*;
