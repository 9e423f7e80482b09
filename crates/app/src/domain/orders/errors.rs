//! Order errors.

use thiserror::Error;

use crate::backend::BackendError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("backend error")]
    Backend(#[from] BackendError),
}

/// Reasons a checkout did not complete. The cart is untouched in every case.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("customer name is required")]
    MissingCustomerName,

    #[error("email is required")]
    MissingEmail,

    #[error("a checkout is already in progress")]
    InProgress,

    #[error("order was not accepted: {0}")]
    Rejected(String),

    #[error("order submission failed")]
    Orders(#[from] OrdersServiceError),
}
