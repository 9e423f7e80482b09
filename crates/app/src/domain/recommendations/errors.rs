//! Recommendation errors.

use thiserror::Error;

use crate::backend::BackendError;

#[derive(Debug, Error)]
pub enum RecommendationsServiceError {
    #[error("problem description is blank")]
    BlankProblem,

    #[error("backend error")]
    Backend(#[from] BackendError),
}
