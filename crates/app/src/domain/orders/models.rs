//! Order Models

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{carts::models::CartLine, products::models::Sku};

/// Acknowledgment status the backend uses for an accepted order.
pub const ACK_STATUS_SUCCESS: &str = "success";

/// Cart line flattened into the shape the order API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub sku: Sku,
    pub item_name: String,
    pub quantity: NonZeroU32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image_url: String,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            sku: line.product.sku.clone(),
            item_name: line.product.item_name.clone(),
            quantity: line.quantity,
            price: line.product.price,
            image_url: line.product.image_url.clone(),
        }
    }
}

/// Transient order payload built at checkout time and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Client-generated and not durable; the backend owns real identifiers.
    pub order_id: u32,
    pub customer_name: String,
    pub email: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub is_priority: bool,
    pub items: Vec<OrderLine>,
}

/// Order-acceptance response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderAck {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl OrderAck {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ACK_STATUS_SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn success_ack_is_recognised() -> TestResult {
        let ack: OrderAck = serde_json::from_str(
            r#"{"status":"success","message":"Order 42 saved.","clean_data":{"order_id":42}}"#,
        )?;

        assert!(ack.is_success());
        assert_eq!(ack.message, "Order 42 saved.");

        Ok(())
    }

    #[test]
    fn any_other_status_is_not_success() -> TestResult {
        let ack: OrderAck = serde_json::from_str(r#"{"status":"error"}"#)?;

        assert!(!ack.is_success());
        assert!(ack.message.is_empty());

        Ok(())
    }
}
