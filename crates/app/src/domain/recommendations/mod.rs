//! Solution recommendations

pub mod adopt;
pub mod errors;
pub mod models;
pub mod service;

pub use adopt::add_recommended;
pub use errors::RecommendationsServiceError;
pub use models::{Problem, Proposal, RecommendedItem};
pub use service::*;
