//! Products service errors.

use thiserror::Error;

use crate::backend::BackendError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product not found")]
    NotFound,

    #[error("backend error")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for ProductsServiceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::NotFound => Self::NotFound,
            other => Self::Backend(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_not_found_becomes_product_not_found() {
        let error = ProductsServiceError::from(BackendError::NotFound);

        assert!(matches!(error, ProductsServiceError::NotFound));
    }

    #[test]
    fn other_backend_errors_are_wrapped() {
        let error = ProductsServiceError::from(BackendError::UnexpectedResponse(
            "GET /products failed with status 500".to_string(),
        ));

        assert!(matches!(error, ProductsServiceError::Backend(_)));
    }
}
