//! Cart errors.

use std::io;

use thiserror::Error;

use crate::domain::products::models::Sku;

/// Failure reading or writing the persisted cart slot.
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("cart slot I/O failed")]
    Io(#[from] io::Error),
}

/// Persisted cart contents that cannot be turned back into a [`Cart`].
///
/// [`Cart`]: super::Cart
#[derive(Debug, Error)]
pub enum CartDecodeError {
    #[error("malformed cart snapshot")]
    Json(#[from] serde_json::Error),

    #[error("cart snapshot holds more than one line for SKU {0}")]
    DuplicateSku(Sku),

    #[error("cart snapshot total does not fit a decimal")]
    TotalOverflow,
}

#[derive(Debug, Error)]
pub enum CartSyncError {
    #[error("cart change channel closed")]
    Closed,

    #[error("no async runtime to poll the cart slot on")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
