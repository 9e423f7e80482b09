//! Recommendation Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::products::models::Sku;

/// Recommendation request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub problem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedItem {
    pub sku: Sku,
    pub item_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub rationale: String,
}

/// Proposal Model
///
/// Synthesized by the backend; the client only displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub summary: String,
    #[serde(default)]
    pub recommended_items: Vec<RecommendedItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_cost: Decimal,
}

impl Proposal {
    /// SKUs of the recommended items, in proposal order.
    pub fn skus(&self) -> impl Iterator<Item = &Sku> {
        self.recommended_items.iter().map(|item| &item.sku)
    }
}
