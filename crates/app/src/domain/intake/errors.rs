//! Intake errors.

use thiserror::Error;

use crate::{backend::BackendError, domain::orders::errors::OrdersServiceError};

#[derive(Debug, Error)]
pub enum IntakeServiceError {
    #[error("backend error")]
    Backend(#[from] BackendError),
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("order text is blank")]
    BlankText,

    #[error("order extraction failed")]
    Extraction(#[from] IntakeServiceError),

    #[error("forwarding the extracted order failed")]
    Orders(#[from] OrdersServiceError),
}
