//! Intake Models

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::orders::{models::OrderAck, notice::Notice};

/// Extraction request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderText {
    pub order_text: String,
}

/// Result of forwarding a recognized extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeOutcome {
    /// Number of entries in the extraction's `items` list.
    pub item_count: usize,
    pub ack: OrderAck,
    pub notice: Notice,
}

/// Length of the `items` list when the extraction carries one.
///
/// Nothing else about the document is inspected.
#[must_use]
pub fn extracted_item_count(extraction: &Value) -> Option<usize> {
    extraction.get("items")?.as_array().map(Vec::len)
}

/// Notice text shown once an extraction has been forwarded.
#[must_use]
pub fn success_message(item_count: usize) -> String {
    format!("AI successfully processed your order! ({item_count} items)")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn counts_items_only_when_list_present() {
        assert_eq!(extracted_item_count(&json!({"items": [1, 2, 3]})), Some(3));
        assert_eq!(extracted_item_count(&json!({"items": []})), Some(0));
        assert_eq!(extracted_item_count(&json!({"items": "CS-001"})), None);
        assert_eq!(extracted_item_count(&json!({"error": "unparseable"})), None);
        assert_eq!(extracted_item_count(&json!([{"sku": "CS-001"}])), None);
    }

    #[test]
    fn success_message_names_item_count() {
        assert_eq!(
            success_message(2),
            "AI successfully processed your order! (2 items)"
        );
    }
}
